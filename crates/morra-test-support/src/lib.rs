//! Shared test mocks and utilities for the Morra player service.

mod clock;
mod repository;
mod rng;

pub use clock::FixedClock;
pub use repository::{
    ConnectionLedger, FailingRoundStore, InMemoryRoundStore, StallingRoundStore,
    UnreachableRoundStore,
};
pub use rng::{MockRng, SequenceRng};
