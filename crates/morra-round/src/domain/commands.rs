//! Commands for the round context.

use morra_core::command::Command;
use uuid::Uuid;

use super::record::RoundRecord;

/// Command to resolve this player's turn in a round.
#[derive(Debug, Clone)]
pub struct ResolveTurn {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game being played.
    pub game_id: String,
    /// The round being played.
    pub round_number: i64,
    /// Number of players taking part in the round.
    pub player_count: u32,
}

impl Command for ResolveTurn {
    fn command_type(&self) -> &'static str {
        "round.resolve_turn"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to persist a finished round.
#[derive(Debug, Clone)]
pub struct RecordRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The round as reported by the caller.
    pub record: RoundRecord,
}

impl Command for RecordRound {
    fn command_type(&self) -> &'static str {
        "round.record_round"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
