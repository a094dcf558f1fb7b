use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Book, Category},
    routes::AppState,
    services::catalog,
};

pub const NO_RESULTS: &str = "No results found. Try a different search term.";

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub max_results: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub slug: Category,
    pub label: &'static str,
    pub query: &'static str,
}

/// Handler for stateless book search
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let max_results = params.max_results.unwrap_or(state.settings.search_max_results);

    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        max_results,
        "Processing book search"
    );

    let books = catalog::search_books(state.catalog.clone(), &params.q, max_results).await;
    if books.is_empty() {
        return Err(AppError::NotFound(NO_RESULTS.to_string()));
    }

    Ok(Json(SearchResponse {
        query: params.q,
        total: books.len(),
        books,
    }))
}

/// Lists the genre shortcuts available for browsing
pub async fn list_categories() -> Json<Vec<CategoryResponse>> {
    Json(
        Category::ALL
            .iter()
            .map(|&category| CategoryResponse {
                slug: category,
                label: category.label(),
                query: category.query(),
            })
            .collect(),
    )
}
