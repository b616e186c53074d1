//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    /// A persistence operation did not finish before its deadline.
    #[error("deadline exceeded before the round store responded")]
    DeadlineExceeded,

    /// No round store is configured for this process.
    #[error("round store not configured")]
    NotConfigured,
}
