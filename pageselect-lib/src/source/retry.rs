//! Retry policy for page fetches.

use std::time::Duration;

use crate::error::FetchError;

/// How many times a failed page fetch is re-issued, and how long to wait.
///
/// Only errors that [`FetchError::is_retryable`] accepts are retried: rate
/// limiting, gateway and availability statuses, timeouts and transport
/// failures. Once the budget is spent the error reaches the session, which
/// shows an empty page.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pageselect_lib::source::RetryConfig;
///
/// let patient = RetryConfig::default()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(100));
/// assert_eq!(patient.delay_for(2), Duration::from_millis(400));
///
/// assert_eq!(RetryConfig::no_retry().max_retries, 0);
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Re-issues allowed after the first failure.
    pub max_retries: u32,
    /// Wait before the first re-issue; doubles each time.
    pub initial_delay: Duration,
    /// Ceiling for the wait.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryConfig {
    /// Fails on the first error.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Returns true if `error` should be retried after `attempt` failures.
    pub fn should_retry(&self, error: &FetchError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}
