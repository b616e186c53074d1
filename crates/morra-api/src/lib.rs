//! Morra player service — HTTP API.
//!
//! Exposes turn resolution and round recording over axum, along with health,
//! readiness and prometheus endpoints.

use axum::Router;

pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod telemetry;

/// Builds the full application router over `state`.
///
/// Transport layers (tracing, CORS) are added by the binary.
pub fn build_router(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::turn::router())
        .merge(routes::record::router())
        .merge(routes::metrics::router())
        .with_state(state)
}
