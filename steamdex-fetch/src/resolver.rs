//! Bounded-retry wrapper around a single-attempt fetcher.

use std::time::Duration;
use tracing::{debug, warn};

use steamdex_core::{AppId, DetailOutcome, Resolution};

use crate::error::FetchError;
use crate::fetcher::DetailFetcher;
use crate::retry::RetryStrategy;

/// Resolves app IDs by retrying a [`DetailFetcher`] with exponential
/// backoff.
///
/// Only retryable errors consume attempts; a confirmed absence or a
/// success returns immediately. Exhausting the attempt budget yields
/// [`Resolution::Failed`], which callers record for a later sweep
/// rather than propagate.
pub struct DetailResolver<F> {
    fetcher: F,
    strategy: RetryStrategy,
}

impl<F: DetailFetcher> DetailResolver<F> {
    /// Creates a resolver with the default retry schedule.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            strategy: RetryStrategy::default(),
        }
    }

    /// Creates a resolver with a custom retry schedule.
    pub fn with_strategy(fetcher: F, strategy: RetryStrategy) -> Self {
        Self { fetcher, strategy }
    }

    /// Returns the retry schedule in use.
    pub fn strategy(&self) -> &RetryStrategy {
        &self.strategy
    }

    /// Fetches one app ID, retrying retryable errors until the attempt
    /// budget is spent.
    pub async fn resolve(&self, app_id: AppId) -> Resolution {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            match self.fetcher.fetch_detail(app_id).await {
                Ok(DetailOutcome::Found(record)) => {
                    debug!(app_id, attempt, "Resolved detail record");
                    return Resolution::Resolved(record);
                }
                Ok(DetailOutcome::Absent) => {
                    // Terminal answer; retrying cannot change it.
                    debug!(app_id, "App does not exist or has no data");
                    return Resolution::Absent;
                }
                Err(e) if attempt >= self.strategy.max_attempts => {
                    warn!(app_id, attempts = attempt, error = %e, "Giving up after exhausting retries");
                    return Resolution::Failed;
                }
                Err(e) => {
                    let delay = self.delay_after(&e, attempt);
                    warn!(app_id, attempt, delay_secs = delay.as_secs(), error = %e, "Attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Picks the wait after a failed attempt, honoring a server-sent
    /// Retry-After hint over the computed schedule.
    fn delay_after(&self, error: &FetchError, attempt: u32) -> Duration {
        match error {
            FetchError::RateLimited {
                retry_after: Some(secs),
            } => Duration::from_secs((*secs).min(self.strategy.max_delay_secs)),
            _ => self.strategy.delay_for_attempt(attempt),
        }
    }
}
