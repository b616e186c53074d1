//! Routes for recording finished rounds and reading them back.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

use morra_core::repository::RoundEntry;
use morra_round::application::command_handlers::{self, RecordOutcome};
use morra_round::application::query_handlers::{self, RoundView};
use morra_round::domain::commands;
use morra_round::domain::record::RoundRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// One player's line in a POST /record body.
#[derive(Debug, Deserialize, Serialize)]
pub struct RecordEntryRequest {
    /// The player identifier.
    #[serde(rename = "recplayerid")]
    pub player_id: String,
    /// The call the player made.
    #[serde(rename = "reccall")]
    pub call: i64,
    /// The throw the player showed.
    #[serde(rename = "recturn")]
    pub turn: i64,
}

/// Request body for POST /record.
#[derive(Debug, Deserialize, Serialize)]
pub struct RecordRequest {
    /// The game identifier.
    #[serde(rename = "recgameid")]
    pub game_id: String,
    /// The round number.
    #[serde(rename = "recroundno")]
    pub round_number: i64,
    /// Player entries; may be empty but must be present.
    #[serde(rename = "recround")]
    pub entries: Vec<RecordEntryRequest>,
}

impl From<RecordRequest> for RoundRecord {
    fn from(request: RecordRequest) -> Self {
        Self {
            game_id: request.game_id,
            round_number: request.round_number,
            entries: request
                .entries
                .into_iter()
                .map(|entry| RoundEntry {
                    player_id: entry.player_id,
                    call: entry.call,
                    turn: entry.turn,
                })
                .collect(),
        }
    }
}

/// Response body for GET /record/{game_id}.
#[derive(Debug, Serialize)]
pub struct RoundsResponse {
    /// Rounds recorded for the game, in round order.
    pub rounds: Vec<RoundView>,
}

/// POST /record
///
/// `201` when written, `403` when no round store is configured, `500` when
/// the round is rejected.
#[instrument(
    skip(state, request),
    fields(game_id = %request.game_id, round_number = request.round_number)
)]
async fn record(State(state): State<AppState>, Json(request): Json<RecordRequest>) -> Response {
    let deadline = Instant::now() + state.record_deadline;
    let command = commands::RecordRound {
        correlation_id: Uuid::new_v4(),
        record: request.into(),
    };

    info!(
        correlation_id = %command.correlation_id,
        entries = command.record.entries.len(),
        "handling record_round command"
    );

    let outcome = command_handlers::handle_record_round(
        &command,
        state.clock.as_ref(),
        state.round_store.as_deref(),
        deadline,
    )
    .await;
    state.metrics.record_outcome(&outcome);

    match outcome {
        RecordOutcome::Accepted(_) => StatusCode::CREATED.into_response(),
        RecordOutcome::Unavailable(message) => (StatusCode::FORBIDDEN, message).into_response(),
        RecordOutcome::Rejected(err) => {
            ApiError(err).into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /record/{game_id}
#[instrument(skip(state))]
async fn get_rounds(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<RoundsResponse>, ApiError> {
    let deadline = Instant::now() + state.record_deadline;

    let rounds =
        query_handlers::get_game_rounds(&game_id, state.round_store.as_deref(), deadline).await?;

    Ok(Json(RoundsResponse { rounds }))
}

/// Returns the router for round recording.
///
/// The game orchestrator posts to `/record/`, so the trailing-slash form is
/// served as well.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/record", post(record))
        .route("/record/", post(record))
        .route("/record/{game_id}", get(get_rounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use morra_core::clock::Clock;
    use morra_core::repository::RoundStore;
    use morra_core::rng::DeterministicRng;
    use morra_test_support::{
        FailingRoundStore, FixedClock, InMemoryRoundStore, MockRng, StallingRoundStore,
        UnreachableRoundStore,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::metrics::GameMetrics;

    fn app_state_with(round_store: Option<Arc<dyn RoundStore>>) -> AppState {
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ));
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        AppState::new(clock, rng, round_store, Arc::new(GameMetrics::new().unwrap()))
    }

    fn sample_body() -> Value {
        serde_json::json!({
            "recgameid": "123-456-789",
            "recroundno": 1,
            "recround": [
                { "recplayerid": "987-654-321", "reccall": 4, "recturn": 3 },
                { "recplayerid": "987-654-322", "reccall": 1, "recturn": 2 }
            ]
        })
    }

    fn record_request(body: &Value) -> Request<Body> {
        record_request_to("/record", body)
    }

    fn record_request_to(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_record_returns_201_and_persists_round() {
        // Arrange
        let store = Arc::new(InMemoryRoundStore::new());
        let app = router().with_state(app_state_with(Some(store.clone())));

        // Act
        let response = app.oneshot(record_request(&sample_body())).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::CREATED);

        let rounds = store.rounds();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].game_id, "123-456-789");
        assert_eq!(rounds[0].entries.len(), 2);
        assert_eq!(rounds[0].entries[1].player_id, "987-654-322");
        assert_eq!(store.ledger().released(), 1);
    }

    #[tokio::test]
    async fn test_record_accepts_trailing_slash() {
        // Arrange
        let store = Arc::new(InMemoryRoundStore::new());
        let app = router().with_state(app_state_with(Some(store.clone())));

        // Act
        let response = app
            .oneshot(record_request_to("/record/", &sample_body()))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(store.rounds().len(), 1);
    }

    #[tokio::test]
    async fn test_record_accepts_empty_round() {
        // Arrange
        let store = Arc::new(InMemoryRoundStore::new());
        let app = router().with_state(app_state_with(Some(store.clone())));
        let body = serde_json::json!({
            "recgameid": "g",
            "recroundno": 2,
            "recround": []
        });

        // Act
        let response = app.oneshot(record_request(&body)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(store.rounds()[0].entries.is_empty());
    }

    #[tokio::test]
    async fn test_record_returns_403_without_store() {
        // Arrange
        let app = router().with_state(app_state_with(None));

        // Act
        let response = app.oneshot(record_request(&sample_body())).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let text = String::from_utf8(body_bytes(response).await).unwrap();
        assert_eq!(text, command_handlers::NOT_CONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn test_record_returns_500_when_store_fails() {
        // Arrange
        let store = Arc::new(FailingRoundStore::new());
        let app = router().with_state(app_state_with(Some(store.clone())));

        // Act
        let response = app.oneshot(record_request(&sample_body())).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["error"], "infrastructure_error");
        assert_eq!(store.ledger().acquired(), 1);
        assert_eq!(store.ledger().released(), 1);
    }

    #[tokio::test]
    async fn test_record_returns_500_when_store_unreachable() {
        // Arrange
        let app = router().with_state(app_state_with(Some(Arc::new(UnreachableRoundStore))));

        // Act
        let response = app.oneshot(record_request(&sample_body())).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_record_returns_500_when_deadline_expires() {
        // Arrange
        let store = Arc::new(StallingRoundStore::new());
        let state = app_state_with(Some(store.clone()))
            .with_record_deadline(Duration::from_millis(50));
        let app = router().with_state(state);

        // Act
        let response = app.oneshot(record_request(&sample_body())).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["error"], "deadline_exceeded");
        assert_eq!(store.ledger().released(), 1);
    }

    #[tokio::test]
    async fn test_record_returns_500_for_blank_game_id() {
        // Arrange
        let store = Arc::new(InMemoryRoundStore::new());
        let app = router().with_state(app_state_with(Some(store.clone())));
        let body = serde_json::json!({
            "recgameid": "",
            "recroundno": 1,
            "recround": []
        });

        // Act
        let response = app.oneshot(record_request(&body)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["error"], "validation_error");
        assert!(store.rounds().is_empty());
    }

    #[tokio::test]
    async fn test_record_returns_422_without_entries() {
        // Arrange
        let app = router().with_state(app_state_with(Some(Arc::new(InMemoryRoundStore::new()))));
        let body = serde_json::json!({ "recgameid": "g", "recroundno": 1 });

        // Act
        let response = app.oneshot(record_request(&body)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_rounds_returns_recorded_rounds() {
        // Arrange
        let store = Arc::new(InMemoryRoundStore::new());
        let state = app_state_with(Some(store.clone()));
        router()
            .with_state(state.clone())
            .oneshot(record_request(&sample_body()))
            .await
            .unwrap();

        let request = Request::builder()
            .method("GET")
            .uri("/record/123-456-789")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = router().with_state(state).oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let rounds = json["rounds"].as_array().unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0]["recgameid"], "123-456-789");
        assert_eq!(rounds[0]["recroundno"], 1);
        assert_eq!(rounds[0]["recround"][0]["recplayerid"], "987-654-321");
        assert_eq!(rounds[0]["recordedat"], "2026-01-15T10:00:00Z");
    }

    #[tokio::test]
    async fn test_get_rounds_returns_403_without_store() {
        // Arrange
        let app = router().with_state(app_state_with(None));
        let request = Request::builder()
            .method("GET")
            .uri("/record/123-456-789")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["error"], "not_configured");
    }
}
