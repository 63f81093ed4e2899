//! Timeout and bounded exponential-backoff retry for outbound provider calls

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::HttpConfig;
use crate::errors::ProviderError;
use crate::errors::ProviderErrorKind;

/// Backoff doubling stops after this many attempts
const MAX_BACKOFF_SHIFT: u32 = 5;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.backoff_base_ms),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT);
        self.base_delay.saturating_mul(1 << shift)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is exhausted. Each attempt is bounded by `timeout`.
    pub async fn run<T, F, Fut>(&self, provider: &'static str, mut op: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 1;
        loop {
            let result = match tokio::time::timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::new(
                    provider,
                    ProviderErrorKind::Timeout,
                    format!("no response within {:?}", self.timeout),
                )),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(
                        "{} call failed (attempt {}/{}): {}; retrying in {:?}",
                        provider, attempt, self.max_attempts, err, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
