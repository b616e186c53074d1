//! Route modules.

pub mod health;
pub mod metrics;
pub mod record;
pub mod turn;
