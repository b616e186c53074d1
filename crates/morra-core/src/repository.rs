//! Round store abstraction.
//!
//! A store hands out one connection per request. The connection is released
//! by consuming it, so a holder can release it at most once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// One player's line in a recorded round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEntry {
    /// Identifier of the player.
    pub player_id: String,
    /// The call the player made.
    pub call: i64,
    /// The throw the player showed.
    pub turn: i64,
}

/// Stored representation of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRound {
    /// Unique record identifier.
    pub record_id: Uuid,
    /// Game this round belongs to.
    pub game_id: String,
    /// Round number within the game.
    pub round_number: i64,
    /// Player entries, in the order the caller supplied them.
    pub entries: Vec<RoundEntry>,
    /// Timestamp of persistence.
    pub recorded_at: DateTime<Utc>,
}

/// Factory for per-request round store connections.
#[async_trait]
pub trait RoundStore: Send + Sync {
    /// Open a fresh connection to the backing store.
    async fn connect(&self) -> Result<Box<dyn RoundConnection>, DomainError>;
}

/// A live connection to the round store.
#[async_trait]
pub trait RoundConnection: Send {
    /// Write one round.
    async fn insert_round(&mut self, round: &StoredRound) -> Result<(), DomainError>;

    /// Load every round recorded for a game, ordered by round number then
    /// record time.
    async fn load_rounds(&mut self, game_id: &str) -> Result<Vec<StoredRound>, DomainError>;

    /// Close the connection.
    async fn release(self: Box<Self>) -> Result<(), DomainError>;
}
