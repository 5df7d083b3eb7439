use crate::config::RetrySettings;
use crate::error::Result;
use std::time::Duration;

/// Upper bound on a single backoff delay, whatever the configured
/// multiplier and retry count produce.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Exponential-backoff wrapper around a fallible async operation.
///
/// Runs one initial attempt plus up to `max_redeliveries` retries. Only
/// errors classified retryable trigger a redelivery; anything else fails the
/// operation immediately. The delay before retry `n` (0-indexed) is
/// `initial_delay * backoff_multiplier^n`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_redeliveries: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
}

impl RetryPolicy {
    pub fn new(settings: &RetrySettings) -> Self {
        Self {
            max_redeliveries: settings.max_redeliveries,
            initial_delay: Duration::from_millis(settings.redelivery_delay_ms),
            // A multiplier below 1 (or NaN) would shrink or invert the
            // backoff; settings flow in unvalidated from CLI and config.
            backoff_multiplier: settings.backoff_multiplier.max(1.0),
        }
    }

    /// Total attempts the policy will make, counting the initial one.
    pub fn max_attempts(&self) -> u32 {
        self.max_redeliveries + 1
    }

    fn delay_before_retry(&self, retry: u32) -> Duration {
        // Computed in f64 so an overflowing product saturates at the cap
        // instead of panicking in Duration arithmetic.
        let factor = self.backoff_multiplier.powi(retry as i32);
        let secs = (self.initial_delay.as_secs_f64() * factor)
            .min(MAX_RETRY_DELAY.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && retry < self.max_redeliveries => {
                    let delay = self.delay_before_retry(retry);
                    retry += 1;
                    tracing::warn!(
                        retry,
                        max_redeliveries = self.max_redeliveries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after gateway failure"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
