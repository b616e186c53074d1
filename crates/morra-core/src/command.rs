//! Command abstractions.

use uuid::Uuid;

/// A request to the round context, tagged for log correlation.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name used in log lines, e.g. `round.resolve_turn`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID minted at the HTTP boundary.
    fn correlation_id(&self) -> Uuid;
}
