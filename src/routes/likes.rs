use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Book,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub added: bool,
    pub message: &'static str,
    pub total: usize,
    pub book: Book,
}

#[derive(Debug, Serialize)]
pub struct LikedBooksResponse {
    pub total: usize,
    pub books: Vec<Book>,
}

/// Lists the session's liked books
pub async fn list(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<LikedBooksResponse>> {
    let session = state.session(session_id).await?;
    Ok(Json(LikedBooksResponse {
        total: session.liked.len(),
        books: session.liked.iter().cloned().collect(),
    }))
}

/// Likes a book the session has been shown
pub async fn add(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<LikeRequest>,
) -> AppResult<(StatusCode, Json<LikeResponse>)> {
    let outcome = state
        .with_session(session_id, |session| {
            let book = session.find_known(&request.book_id)?.clone();
            let added = session.liked.add(book.clone());
            Some((added, session.liked.len(), book))
        })
        .await?;

    let (added, total, book) = outcome.ok_or_else(|| {
        AppError::NotFound(format!(
            "Book {} is not among this session's results",
            request.book_id
        ))
    })?;

    tracing::info!(
        session_id = %session_id,
        book_id = %book.id,
        added,
        total,
        "Like processed"
    );

    let (status, message) = if added {
        (StatusCode::CREATED, "Added to liked books!")
    } else {
        (StatusCode::OK, "Already in liked books")
    };

    Ok((
        status,
        Json(LikeResponse {
            added,
            message,
            total,
            book,
        }),
    ))
}

/// Removes a book from the session's liked books
pub async fn remove(
    State(state): State<AppState>,
    Path((session_id, book_id)): Path<(Uuid, String)>,
) -> AppResult<StatusCode> {
    let removed = state
        .with_session(session_id, |session| session.liked.remove(&book_id))
        .await?;

    match removed {
        Some(book) => {
            tracing::info!(session_id = %session_id, book_id = %book.id, "Like removed");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::NotFound(format!(
            "Book {} is not in liked books",
            book_id
        ))),
    }
}
