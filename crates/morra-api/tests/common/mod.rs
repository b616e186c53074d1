//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use morra_core::clock::Clock;
use morra_core::repository::RoundStore;
use morra_core::rng::DeterministicRng;
use morra_test_support::{FixedClock, MockRng};
use tower::ServiceExt;

use morra_api::build_router;
use morra_api::metrics::GameMetrics;
use morra_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build state with a deterministic clock and the given rng and store.
pub fn test_state(
    rng: impl DeterministicRng + Send + 'static,
    round_store: Option<Arc<dyn RoundStore>>,
) -> AppState {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let metrics = Arc::new(GameMetrics::new().unwrap());
    AppState::new(fixed_clock(), rng, round_store, metrics)
}

/// Build the full app router with no round store configured.
pub fn build_test_app() -> Router {
    build_router(test_state(MockRng, None))
}

/// Build the full app router over `round_store`.
pub fn build_test_app_with_store(round_store: Arc<dyn RoundStore>) -> Router {
    build_router(test_state(MockRng, Some(round_store)))
}

/// Build the full app router over `round_store` with a shortened deadline.
pub fn build_test_app_with_deadline(
    round_store: Arc<dyn RoundStore>,
    deadline: Duration,
) -> Router {
    build_router(test_state(MockRng, Some(round_store)).with_record_deadline(deadline))
}

/// Build the full app router with a custom rng for deterministic turns.
pub fn build_test_app_with_rng(rng: impl DeterministicRng + Send + 'static) -> Router {
    build_router(test_state(rng, None))
}

/// Send a POST request with a JSON body and return the status and raw body.
pub async fn post(app: Router, uri: &str, body: &serde_json::Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with a JSON body and return the response as JSON.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = post(app, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Send a GET request and return the status and raw body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response as JSON.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = get(app, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, body_bytes.to_vec())
}
