use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::RecommendationSet,
    routes::AppState,
    services::recommendations::{self, DEFAULT_TOP_K},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Title of a liked book
    pub title: String,
    pub top_k: Option<usize>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationSet>> {
    let session = state.session(session_id).await?;

    if session.liked.is_empty() {
        return Err(AppError::InvalidInput(
            "Like at least one book to get recommendations.".to_string(),
        ));
    }

    let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K);
    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        title = %request.title,
        top_k,
        liked = session.liked.len(),
        candidates = session.search_results.len(),
        "Processing recommendation request"
    );

    let set = recommendations::recommend(
        &session.search_results,
        &session.liked,
        &request.title,
        top_k,
        &state.settings.recommendation,
    )?;

    Ok(Json(set))
}
