//! Retry strategy for detail fetches.

use std::time::Duration;

/// Bounded exponential backoff policy.
///
/// The schedule is a plain function of the attempt number so tests can
/// inspect it without sleeping: attempt `n` waits
/// `base_delay_secs * backoff_factor^(n-1)`, capped at
/// `max_delay_secs`.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before the second attempt, in seconds.
    pub base_delay_secs: u64,
    /// Multiplier applied per subsequent attempt.
    pub backoff_factor: u64,
    /// Cap on any single delay.
    pub max_delay_secs: u64,
}

impl RetryStrategy {
    /// Creates a strategy with the given attempt budget and the
    /// default 1s / x2 / 120s schedule.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_secs: 1,
            backoff_factor: 2,
            max_delay_secs: 120,
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay_secs: 0,
            backoff_factor: 1,
            max_delay_secs: 0,
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, secs: u64) -> Self {
        self.base_delay_secs = secs;
        self
    }

    /// Sets the backoff factor.
    pub fn with_backoff_factor(mut self, factor: u64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Sets the delay cap.
    pub fn with_max_delay(mut self, secs: u64) -> Self {
        self.max_delay_secs = secs;
        self
    }

    /// Calculates the delay after a given failed attempt number
    /// (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1);
        let delay = self
            .backoff_factor
            .checked_pow(exp)
            .and_then(|f| f.checked_mul(self.base_delay_secs))
            .unwrap_or(self.max_delay_secs);

        Duration::from_secs(delay.min(self.max_delay_secs))
    }
}

impl Default for RetryStrategy {
    /// The reference schedule: 8 attempts, 1s initial delay, doubling,
    /// capped at 120s.
    fn default() -> Self {
        Self::new(8)
    }
}
