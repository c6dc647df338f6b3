//! Core error types for steamdex.

use thiserror::Error;

/// Core error type for steamdex operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid data from an API response or a persisted artifact.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
