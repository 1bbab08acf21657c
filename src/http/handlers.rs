//! Request handlers
//!
//! Handlers map workflow outcomes to pages and flash-carrying redirects.
//! Storage failures never escape as panics; they turn into a generic danger
//! flash with the state unchanged.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::service::{Analyzer, CheckError, SubmitOutcome};

use super::flash::{has_flash_cookie, page_response, redirect_with_flash, take_flash, Flash};
use super::render;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

/// Submission form body
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub url: String,
}

#[derive(Serialize)]
struct HealthResponse {
    healthy: bool,
    version: String,
}

/// Landing page with the submission form
pub async fn index(headers: HeaderMap) -> Response {
    let flash = take_flash(&headers);
    page_response(render::index_page(flash), has_flash_cookie(&headers))
}

/// List all entries with their latest check
pub async fn list_urls(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let flash = take_flash(&headers);
    match state.analyzer.list_urls() {
        Ok(summaries) => page_response(render::urls_page(flash, &summaries), has_flash_cookie(&headers)),
        Err(e) => {
            error!("Failed to list URLs: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle a URL submission
pub async fn submit_url(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Response {
    debug!("URL submission: {:?}", form.url);
    match state.analyzer.submit_url(&form.url) {
        Ok(SubmitOutcome::Created(id)) => {
            redirect_with_flash(&format!("/urls/{}", id), Flash::UrlAdded)
        }
        Ok(SubmitOutcome::Exists(id)) => {
            redirect_with_flash(&format!("/urls/{}", id), Flash::UrlExists)
        }
        Ok(SubmitOutcome::Invalid(_)) => redirect_with_flash("/", Flash::InvalidUrl),
        Err(e) => {
            error!("Failed to store URL: {}", e);
            redirect_with_flash("/", Flash::StorageFailed)
        }
    }
}

/// Entry detail page with check history
pub async fn url_detail(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let flash = take_flash(&headers);
    match state.analyzer.url_detail(id) {
        Ok(Some((entry, checks))) => page_response(
            render::detail_page(flash, &entry, &checks),
            has_flash_cookie(&headers),
        ),
        Ok(None) => not_found_response(flash, has_flash_cookie(&headers)),
        Err(e) => {
            error!("Failed to load URL {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Trigger a check for an entry
pub async fn run_check(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let detail = format!("/urls/{}", id);
    match state.analyzer.run_check(id).await {
        Ok(_) => redirect_with_flash(&detail, Flash::CheckDone),
        Err(CheckError::NotFound) => not_found_response(Some(Flash::EntryNotFound), false),
        Err(CheckError::Fetch(_)) => redirect_with_flash(&detail, Flash::CheckFailed),
        Err(CheckError::Storage(e)) => {
            error!("Failed to record check for {}: {}", id, e);
            redirect_with_flash(&detail, Flash::StorageFailed)
        }
    }
}

/// 404 page, with the danger banner when the miss came from a user action
fn not_found_response(flash: Option<Flash>, clear_flash: bool) -> Response {
    let mut response = page_response(render::not_found_page(flash), clear_flash);
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use crate::store::UrlStore;
    use axum::body::to_bytes;
    use tempfile::TempDir;

    fn app_state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(UrlStore::open(dir.path()).unwrap());
        let analyzer = Arc::new(Analyzer::new(store, &FetchConfig::default()).unwrap());
        (dir, AppState { analyzer })
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_check_of_unknown_id_is_404_with_danger_flash() {
        let (_dir, state) = app_state();
        let response = run_check(State(state), Path(9999)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let html = body_text(response).await;
        assert!(html.contains("flash-danger"));
        assert!(html.contains("Page not found"));
    }

    #[tokio::test]
    async fn test_detail_of_unknown_id_is_404() {
        let (_dir, state) = app_state();
        let response = url_detail(State(state), Path(7), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
