//! Morra Core — shared domain abstractions.
//!
//! This crate defines the traits and types the round context and the
//! persistence adapter both depend on: the random source, the clock, the
//! round store seam and the domain error. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod repository;
pub mod rng;
