use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

pub mod books;
pub mod likes;
pub mod recommendations;
pub mod sessions;
pub mod state;

pub use state::{AppSettings, AppState};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(books::list_categories))
        .route("/books/search", get(books::search))
        .route("/sessions", post(sessions::create))
        .route("/sessions/:session_id", delete(sessions::remove))
        .route("/sessions/:session_id/search", get(sessions::search))
        .route("/sessions/:session_id/browse/:category", get(sessions::browse))
        .route("/sessions/:session_id/likes", get(likes::list).post(likes::add))
        .route("/sessions/:session_id/likes/:book_id", delete(likes::remove))
        .route(
            "/sessions/:session_id/recommendations",
            post(recommendations::recommend),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
