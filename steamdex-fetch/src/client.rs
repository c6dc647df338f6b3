//! HTTP client abstractions.

use crate::error::FetchError;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Thin HTTP client wrapper.
///
/// Carries the bounded request timeout and user agent; issues exactly
/// one request per call. Retrying is the job of
/// [`crate::DetailResolver`], which keeps the backoff schedule
/// explicit and testable instead of hiding it in the transport.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("steamdex/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { inner: client })
    }

    /// Performs a single GET request.
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        debug!(url = %url, "Making GET request");
        Ok(self.inner.get(url).send().await?)
    }
}
