//! PostgreSQL-backed round store for the Morra player service.

pub mod pg_round_store;
