//! Prometheus scrape endpoint.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use morra_core::error::DomainError;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /metrics
async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .render()
        .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

    Ok(([(CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

/// Returns the metrics router.
pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics))
}
