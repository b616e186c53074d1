//! Route for turn resolution.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use morra_round::application::command_handlers;
use morra_round::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /turn.
#[derive(Debug, Deserialize, Serialize)]
pub struct TurnRequest {
    /// The game being played.
    #[serde(rename = "reqgameid")]
    pub game_id: String,
    /// The round being played.
    #[serde(rename = "reqroundno")]
    pub round_number: i64,
    /// Number of players in the round.
    #[serde(rename = "reqplayercount")]
    pub player_count: u32,
}

/// Response body for POST /turn.
#[derive(Debug, Deserialize, Serialize)]
pub struct TurnResponse {
    /// Echo of the request's game id.
    #[serde(rename = "resgameid")]
    pub game_id: String,
    /// Echo of the request's round number.
    #[serde(rename = "resroundno")]
    pub round_number: i64,
    /// This player's throw.
    #[serde(rename = "resthrow")]
    pub throw: u32,
    /// This player's call.
    #[serde(rename = "rescall")]
    pub call: u64,
}

/// POST /turn
#[instrument(
    skip(state, request),
    fields(game_id = %request.game_id, round_number = request.round_number)
)]
async fn turn(
    State(state): State<AppState>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let command = commands::ResolveTurn {
        correlation_id: Uuid::new_v4(),
        game_id: request.game_id,
        round_number: request.round_number,
        player_count: request.player_count,
    };

    info!(
        correlation_id = %command.correlation_id,
        player_count = command.player_count,
        "handling resolve_turn command"
    );

    let resolved = command_handlers::handle_resolve_turn(&command, &state.rng)?;
    state.metrics.observe_turn(&resolved.turn);

    Ok(Json(TurnResponse {
        game_id: resolved.game_id,
        round_number: resolved.round_number,
        throw: resolved.turn.throw,
        call: resolved.turn.call,
    }))
}

/// Returns the router for turn resolution.
///
/// The game orchestrator posts to `/turn/`, so the trailing-slash form is
/// served as well.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/turn", post(turn))
        .route("/turn/", post(turn))
}
