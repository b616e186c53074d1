//! Morra player service — round context.
//!
//! Responsible for resolving a player's turn (throw and call) and for
//! recording finished rounds to the round store within a deadline.

pub mod application;
pub mod domain;
