//! Application services for the round context.

pub mod command_handlers;
mod connection;
pub mod query_handlers;
