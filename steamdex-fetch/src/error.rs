//! Fetch error types.

use thiserror::Error;

/// Error type for fetch operations.
///
/// Every variant is a *retryable* condition from the drivers' point of
/// view: a confirmed "no such app" answer is not an error at all (see
/// [`steamdex_core::DetailOutcome::Absent`]), so anything that does
/// surface here is worth another attempt until the retry budget runs
/// out.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (transport error or timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by the remote API.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying, from the Retry-After
        /// header when the server sent one.
        retry_after: Option<u64>,
    },

    /// Unexpected status code or response shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Returns true if this error was an explicit rate-limit signal.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }
}
