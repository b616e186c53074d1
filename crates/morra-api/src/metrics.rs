//! Prometheus metrics for the player service.
//!
//! # Metric Specification
//!
//! - `morra_throw_value` (histogram, buckets 1..5): throws handed out.
//! - `morra_call_value` (histogram): calls handed out.
//! - `morra_rounds_recorded_total` (counter, label `outcome`): record
//!   requests by `accepted`, `rejected` or `unavailable`.

use std::fmt;

use morra_round::application::command_handlers::RecordOutcome;
use morra_round::domain::turn::Turn;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
    exponential_buckets,
};

/// Metrics owned by one server instance, registered on their own registry.
#[derive(Clone)]
pub struct GameMetrics {
    registry: Registry,
    throw_value: Histogram,
    call_value: Histogram,
    rounds_recorded: IntCounterVec,
}

impl GameMetrics {
    /// Create and register every metric on a fresh registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric cannot be created or registered.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let throw_value = Histogram::with_opts(
            HistogramOpts::new("morra_throw_value", "Throws made by this player")
                .buckets(vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        )?;
        let call_value = Histogram::with_opts(
            HistogramOpts::new("morra_call_value", "Calls made by this player")
                .buckets(exponential_buckets(1.0, 2.0, 12)?),
        )?;
        let rounds_recorded = IntCounterVec::new(
            Opts::new(
                "morra_rounds_recorded_total",
                "Round record requests by outcome",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(throw_value.clone()))?;
        registry.register(Box::new(call_value.clone()))?;
        registry.register(Box::new(rounds_recorded.clone()))?;

        Ok(Self {
            registry,
            throw_value,
            call_value,
            rounds_recorded,
        })
    }

    /// Record a resolved turn.
    #[allow(clippy::cast_precision_loss)]
    pub fn observe_turn(&self, turn: &Turn) {
        self.throw_value.observe(f64::from(turn.throw));
        self.call_value.observe(turn.call as f64);
    }

    /// Count a record request by outcome.
    pub fn record_outcome(&self, outcome: &RecordOutcome) {
        self.rounds_recorded
            .with_label_values(&[outcome.label()])
            .inc();
    }

    /// Renders every metric in the prometheus text format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl fmt::Debug for GameMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameMetrics").finish_non_exhaustive()
    }
}
