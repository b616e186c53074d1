//! Round records supplied by the game orchestrator.

use chrono::{DateTime, Utc};
use morra_core::error::DomainError;
use morra_core::repository::{RoundEntry, StoredRound};
use uuid::Uuid;

/// A finished round as reported by the caller.
///
/// The service does not compute or check the game content of a record; it
/// only checks that the record is well formed before persisting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    /// Game this round belongs to.
    pub game_id: String,
    /// Round number within the game.
    pub round_number: i64,
    /// Player entries, possibly empty.
    pub entries: Vec<RoundEntry>,
}

impl RoundRecord {
    /// Checks the record's structure.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the game id is blank, the round
    /// number is negative, or any entry has a blank player id.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.game_id.trim().is_empty() {
            return Err(DomainError::Validation(
                "game id must not be blank".to_owned(),
            ));
        }
        if self.round_number < 0 {
            return Err(DomainError::Validation(
                "round number must not be negative".to_owned(),
            ));
        }
        if let Some(position) = self
            .entries
            .iter()
            .position(|entry| entry.player_id.trim().is_empty())
        {
            return Err(DomainError::Validation(format!(
                "entry {position} has a blank player id"
            )));
        }
        Ok(())
    }

    /// Builds the stored form of this record.
    #[must_use]
    pub fn to_stored(&self, record_id: Uuid, recorded_at: DateTime<Utc>) -> StoredRound {
        StoredRound {
            record_id,
            game_id: self.game_id.clone(),
            round_number: self.round_number,
            entries: self.entries.clone(),
            recorded_at,
        }
    }
}
