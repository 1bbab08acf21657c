//! Route definitions

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, AppState};

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/urls", get(handlers::list_urls).post(handlers::submit_url))
        .route("/urls/:id", get(handlers::url_detail))
        .route("/urls/:id/checks", post(handlers::run_check))
        .route("/health", get(handlers::health))
        .with_state(state)
}
