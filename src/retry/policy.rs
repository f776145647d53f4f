//! Retry policy configuration

use std::time::Duration;

/// Configuration for the retry loop around a single remote call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt, so a request is
    /// attempted at most `max_retries + 1` times
    pub max_retries: u32,

    /// Base delay for exponential backoff
    pub base_delay: Duration,

    /// Ceiling on any single backoff delay, including server-supplied hints
    pub max_delay: Duration,

    /// Whether unclassified failures are retried
    pub retry_generic: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            retry_generic: false,
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before the retry following `attempt` (zero-based):
    /// `min(base_delay * 2^attempt, max_delay)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let backoff = self.base_delay.as_secs_f64() * 2f64.powi(attempt.min(32) as i32);
        self.max_delay.min(Duration::from_secs_f64(backoff))
    }
}
