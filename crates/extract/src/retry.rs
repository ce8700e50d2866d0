use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::RetryConfig;
use crate::error::UpstreamError;

pub struct RetryPolicy {
    max_retries: usize,
    initial_backoff: Duration,
    max_backoff: Duration,
    rate_limit_factor: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
            rate_limit_factor: 2,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            rate_limit_factor: config.rate_limit_factor.max(1),
            ..Self::new(config.max_retries, config.initial_backoff_ms, config.max_backoff_ms)
        }
    }

    /// Delay before the retry following failure number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: usize, error: &UpstreamError) -> Duration {
        let exp = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX).min(16);
        let mut delay = self.initial_backoff.saturating_mul(1u32 << exp);
        if matches!(error, UpstreamError::RateLimited { .. }) {
            delay = delay.saturating_mul(self.rate_limit_factor);
        }
        delay.min(self.max_backoff)
    }

    /// Retry an upstream call with exponential backoff.
    /// Errors that are not transient are returned immediately.
    pub async fn retry<F, Fut, T>(&self, operation_name: &str, mut f: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, UpstreamError>>,
    {
        let mut attempt = 0;

        loop {
            match f().await {
                Ok(result) => {
                    if attempt > 0 {
                        info!(
                            operation = operation_name,
                            attempts = attempt + 1,
                            "Operation succeeded after retries"
                        );
                    }
                    return Ok(result);
                }
                Err(e) => {
                    attempt += 1;
                    if !e.is_transient() || attempt > self.max_retries {
                        warn!(
                            operation = operation_name,
                            attempts = attempt,
                            transient = e.is_transient(),
                            error = %e,
                            "Operation failed"
                        );
                        return Err(e);
                    }

                    let backoff = self.backoff_for(attempt, &e);
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Operation failed, retrying"
                    );

                    sleep(backoff).await;
                }
            }
        }
    }
}
