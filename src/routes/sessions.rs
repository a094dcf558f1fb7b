use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Book, Category},
    routes::{
        books::{SearchQuery, SearchResponse, NO_RESULTS},
        AppState,
    },
    services::catalog,
};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub category: Category,
    pub label: &'static str,
    pub total: usize,
    pub books: Vec<Book>,
}

/// Starts a new session
pub async fn create(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session = state.create_session().await;
    tracing::info!(session_id = %session.id, "Session created");

    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// Ends a session and drops its liked books
pub async fn remove(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.remove_session(session_id).await {
        tracing::info!(session_id = %session_id, "Session removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {} not found", session_id)))
    }
}

/// Searches the catalog and keeps the results as the session's candidate pool
///
/// An empty result leaves the previous results in place.
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    // Fail fast on unknown sessions before calling out
    state.session(session_id).await?;

    let max_results = params.max_results.unwrap_or(state.settings.search_max_results);
    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        query = %params.q,
        "Processing session search"
    );

    let books = catalog::search_books(state.catalog.clone(), &params.q, max_results).await;
    if books.is_empty() {
        return Err(AppError::NotFound(NO_RESULTS.to_string()));
    }

    let stored = books.clone();
    state
        .with_session(session_id, |session| session.record_search(&params.q, stored))
        .await?;

    Ok(Json(SearchResponse {
        query: params.q,
        total: books.len(),
        books,
    }))
}

/// Browses a genre and keeps the results so they can be liked
pub async fn browse(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((session_id, category)): Path<(Uuid, Category)>,
) -> AppResult<Json<BrowseResponse>> {
    state.session(session_id).await?;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        category = category.label(),
        "Processing category browse"
    );

    let books = catalog::browse_category(
        state.catalog.clone(),
        category,
        state.settings.browse_max_results,
    )
    .await;

    if books.is_empty() {
        return Err(AppError::NotFound(format!(
            "No {} books found right now. Try again later.",
            category.label()
        )));
    }

    let stored = books.clone();
    state
        .with_session(session_id, |session| session.record_browse(category, stored))
        .await?;

    Ok(Json(BrowseResponse {
        category,
        label: category.label(),
        total: books.len(),
        books,
    }))
}
