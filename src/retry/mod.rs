//! # Retryable Request Execution
//!
//! Wraps a single remote call with failure classification, bounded retries,
//! and exponential backoff that honors server-supplied delay hints.
//!
//! ## Example
//!
//! ```no_run
//! use graphwise::retry::{RequestExecutor, RetryPolicy};
//! use graphwise::error::ProviderError;
//!
//! # async fn example() -> graphwise::error::Result<()> {
//! let executor = RequestExecutor::new(RetryPolicy::default());
//!
//! let answer = executor
//!     .execute(|| async {
//!         // one remote call per invocation
//!         Ok::<_, ProviderError>("MATCH (n) RETURN n LIMIT 25".to_string())
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod policy;

pub use classify::classify;
pub use policy::RetryPolicy;

use crate::error::{ProviderError, Result};
use crate::provider::{LlmProvider, LlmResponse};
use std::future::Future;
use tracing::{debug, info, warn};

/// Executes remote calls under a [`RetryPolicy`].
///
/// Holds no per-request state; one executor can serve any number of
/// concurrent independent requests.
#[derive(Debug, Clone, Default)]
pub struct RequestExecutor {
    policy: RetryPolicy,
}

impl RequestExecutor {
    /// Create an executor with the given policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// The active retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `request` until it succeeds, the failure classifies as terminal,
    /// or retries are exhausted.
    ///
    /// `request` must perform exactly one remote call per invocation. On
    /// failure the raw error is classified; terminal kinds (authentication,
    /// model-not-found) surface immediately after a single attempt, while
    /// retryable kinds back off and try again up to `max_retries` more
    /// times. The returned error always wraps the last underlying cause.
    ///
    /// The only suspension point besides the call itself is the backoff
    /// sleep; dropping the returned future cancels either immediately.
    pub async fn execute<T, F, Fut>(&self, mut request: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, ProviderError>>,
    {
        let max_attempts = self.policy.max_retries + 1;
        let mut attempt: u32 = 0;

        loop {
            match request().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!("Request succeeded after {} retries", attempt);
                    }
                    return Ok(value);
                }
                Err(raw) => {
                    let classified = classify(raw);
                    warn!(
                        "LLM request failed (attempt {}/{}): {}",
                        attempt + 1,
                        max_attempts,
                        classified
                    );

                    if !classified.is_retryable(self.policy.retry_generic) {
                        return Err(classified);
                    }
                    if attempt >= self.policy.max_retries {
                        warn!("Retries exhausted after {} attempts", max_attempts);
                        return Err(classified);
                    }

                    // Prefer the server's own hint, bounded by max_delay
                    let delay = match classified.retry_after() {
                        Some(hint) => hint.min(self.policy.max_delay),
                        None => self.policy.delay_for_attempt(attempt),
                    };
                    info!("Retrying in {:?}", delay);
                    tokio::time::sleep(delay).await;

                    attempt += 1;
                }
            }
        }
    }

    /// Convenience: run a provider generation under this executor.
    pub async fn generate(
        &self,
        provider: &dyn LlmProvider,
        prompt: &str,
    ) -> Result<LlmResponse> {
        self.execute(move || provider.generate(prompt)).await
    }
}
