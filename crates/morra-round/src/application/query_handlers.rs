//! Query handlers for the round context.
//!
//! Reads go through the same per-request connection discipline as writes and
//! return read-only view DTOs.

use chrono::{DateTime, Utc};
use morra_core::error::DomainError;
use morra_core::repository::{RoundStore, StoredRound};
use serde::Serialize;
use tokio::time::{Instant, timeout_at};
use tracing::instrument;
use uuid::Uuid;

use crate::application::connection::{RELEASE_TIMEOUT, acquire};

/// Read-only view of one player's entry in a recorded round.
#[derive(Debug, Serialize)]
pub struct RoundEntryView {
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

/// Read-only view of a recorded round.
#[derive(Debug, Serialize)]
pub struct RoundView {
    /// The record identifier.
    #[serde(rename = "recordid")]
    pub record_id: Uuid,
    /// The game identifier.
    #[serde(rename = "recgameid")]
    pub game_id: String,
    /// The round number.
    #[serde(rename = "recroundno")]
    pub round_number: i64,
    /// Entries in submission order.
    #[serde(rename = "recround")]
    pub entries: Vec<RoundEntryView>,
    /// When the round was persisted.
    #[serde(rename = "recordedat")]
    pub recorded_at: DateTime<Utc>,
}

impl From<StoredRound> for RoundView {
    fn from(round: StoredRound) -> Self {
        Self {
            record_id: round.record_id,
            game_id: round.game_id,
            round_number: round.round_number,
            entries: round
                .entries
                .into_iter()
                .map(|entry| RoundEntryView {
                    player_id: entry.player_id,
                    call: entry.call,
                    turn: entry.turn,
                })
                .collect(),
            recorded_at: round.recorded_at,
        }
    }
}

/// Retrieves every round recorded for a game.
///
/// # Errors
///
/// Returns `DomainError::NotConfigured` if there is no store,
/// `DomainError::DeadlineExceeded` if the store does not answer before
/// `deadline`, and `DomainError::Infrastructure` if the store fails.
#[instrument(skip(store, deadline))]
pub async fn get_game_rounds(
    game_id: &str,
    store: Option<&dyn RoundStore>,
    deadline: Instant,
) -> Result<Vec<RoundView>, DomainError> {
    let store = store.ok_or(DomainError::NotConfigured)?;

    let mut connection = acquire(store, deadline).await?;
    let loaded = timeout_at(deadline, connection.load_rounds(game_id)).await;
    connection.release(RELEASE_TIMEOUT).await;

    let rounds = loaded.map_err(|_| DomainError::DeadlineExceeded)??;
    Ok(rounds.into_iter().map(RoundView::from).collect())
}
