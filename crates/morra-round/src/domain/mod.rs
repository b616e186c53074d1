//! Domain types for the round context.

pub mod commands;
pub mod record;
pub mod turn;
