//! Command handlers for the round context.
//!
//! Turn resolution is synchronous and only touches the shared RNG. Round
//! recording talks to the round store through a per-request connection that
//! is acquired and used within a single deadline, then always released.

use std::sync::Mutex;
use std::time::Duration;

use morra_core::clock::Clock;
use morra_core::command::Command;
use morra_core::error::DomainError;
use morra_core::repository::{RoundStore, StoredRound};
use morra_core::rng::DeterministicRng;
use tokio::time::{Instant, timeout_at};
use tracing::{Span, field, info, instrument, warn};
use uuid::Uuid;

use crate::application::connection::{RELEASE_TIMEOUT, acquire};
use crate::domain::commands::{RecordRound, ResolveTurn};
use crate::domain::turn::{Turn, validate_player_count};

/// Time allowed for recording a round, measured from request receipt.
pub const RECORD_DEADLINE: Duration = Duration::from_secs(10);

/// Explanation returned when no round store is configured.
pub const NOT_CONFIGURED_MESSAGE: &str =
    "no database connection string configured, round will not be recorded";

/// A turn resolved for a specific game and round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTurn {
    /// The game the turn was requested for.
    pub game_id: String,
    /// The round number the turn was requested for.
    pub round_number: i64,
    /// The throw and call.
    pub turn: Turn,
}

/// Result of asking the service to record a round.
#[derive(Debug)]
pub enum RecordOutcome {
    /// The round was written to the store.
    Accepted(StoredRound),
    /// The round was not written: it was malformed, the store failed, or the
    /// deadline expired.
    Rejected(DomainError),
    /// No store is configured; recording is switched off for this process.
    Unavailable(&'static str),
}

impl RecordOutcome {
    /// Short label used for metrics and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted(_) => "accepted",
            Self::Rejected(_) => "rejected",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// Handles the `ResolveTurn` command: validates the player count and draws
/// the throw and call.
///
/// The `Mutex` is locked only for the synchronous draw.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the player count is out of range, or
/// `DomainError::Infrastructure` if the RNG mutex is poisoned.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        game_id = %command.game_id,
        throw = field::Empty,
        call = field::Empty,
    )
)]
pub fn handle_resolve_turn(
    command: &ResolveTurn,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<ResolvedTurn, DomainError> {
    validate_player_count(command.player_count)?;

    let turn = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        Turn::resolve(command.player_count, &mut *rng_guard)
    };

    let span = Span::current();
    span.record("throw", turn.throw);
    span.record("call", turn.call);

    Ok(ResolvedTurn {
        game_id: command.game_id.clone(),
        round_number: command.round_number,
        turn,
    })
}

/// Handles the `RecordRound` command.
///
/// With no store configured this returns `Unavailable` without touching the
/// network. Otherwise the record is validated, a connection is acquired and
/// the round is written, all before `deadline`. Once acquired, the
/// connection is released on every path.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        game_id = %command.record.game_id,
        round_number = command.record.round_number,
        record = field::Empty,
    )
)]
pub async fn handle_record_round(
    command: &RecordRound,
    clock: &dyn Clock,
    store: Option<&dyn RoundStore>,
    deadline: Instant,
) -> RecordOutcome {
    let Some(store) = store else {
        info!("no round store configured, round will not be recorded");
        Span::current().record("record", "round store not configured, round not recorded");
        return RecordOutcome::Unavailable(NOT_CONFIGURED_MESSAGE);
    };

    match persist_round(command, clock, store, deadline).await {
        Ok(round) => {
            info!(record_id = %round.record_id, "round written to store");
            Span::current().record("record", "round successfully written to store");
            RecordOutcome::Accepted(round)
        }
        Err(err) => {
            warn!(error = %err, "round not written to store");
            Span::current().record("record", "error, round not written to store");
            RecordOutcome::Rejected(err)
        }
    }
}

async fn persist_round(
    command: &RecordRound,
    clock: &dyn Clock,
    store: &dyn RoundStore,
    deadline: Instant,
) -> Result<StoredRound, DomainError> {
    command.record.validate()?;
    let round = command.record.to_stored(Uuid::new_v4(), clock.now());

    let mut connection = acquire(store, deadline).await?;
    let written = timeout_at(deadline, connection.insert_round(&round)).await;
    connection.release(RELEASE_TIMEOUT).await;

    written.map_err(|_| DomainError::DeadlineExceeded)??;
    Ok(round)
}
