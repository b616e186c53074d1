//! Shared application state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use morra_core::clock::Clock;
use morra_core::repository::RoundStore;
use morra_core::rng::DeterministicRng;
use morra_round::application::command_handlers::RECORD_DEADLINE;

use crate::metrics::GameMetrics;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used to timestamp recorded rounds.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Process-wide random source for turn resolution.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Round store; `None` when no connection string is configured.
    pub round_store: Option<Arc<dyn RoundStore>>,
    /// Prometheus metrics.
    pub metrics: Arc<GameMetrics>,
    /// Time allowed for each round store request.
    pub record_deadline: Duration,
}

impl AppState {
    /// Create new application state with the standard record deadline.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        round_store: Option<Arc<dyn RoundStore>>,
        metrics: Arc<GameMetrics>,
    ) -> Self {
        Self {
            clock,
            rng,
            round_store,
            metrics,
            record_deadline: RECORD_DEADLINE,
        }
    }

    /// Replace the record deadline. Tests use this to exercise timeouts
    /// without waiting the full ten seconds.
    #[must_use]
    pub fn with_record_deadline(mut self, record_deadline: Duration) -> Self {
        self.record_deadline = record_deadline;
        self
    }
}
