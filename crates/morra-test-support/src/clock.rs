//! Test clock.

use chrono::{DateTime, Utc};
use morra_core::clock::Clock;

/// A clock pinned to one instant, so tests can assert `recorded_at`.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
