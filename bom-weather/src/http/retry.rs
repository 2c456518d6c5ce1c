//! Retry policy with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use rand::RngExt;
use tracing::warn;

use super::error::FetchError;

/// How many times, and how patiently, to retry a failed request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = `max_retries + 1`).
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,

    /// Upper bound of the uniform random jitter added to every delay.
    pub max_jitter: Duration,
}

impl RetryPolicy {
    /// Create a policy with the given parameters.
    pub fn new(max_retries: u32, base_delay: Duration, max_jitter: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_jitter,
        }
    }

    /// Budget for index and letter-group pages.
    pub fn navigation() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(1))
    }

    /// Smaller budget for monthly CSVs, which may legitimately be absent.
    pub fn monthly_csv() -> Self {
        Self::new(2, Duration::from_secs(1), Duration::from_secs(1))
    }

    /// A policy that never retries and never sleeps.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// Backoff before retry number `attempt` (0-based), without jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }

    /// Backoff plus a random jitter in `[0, max_jitter]`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let jitter = if self.max_jitter.is_zero() {
            Duration::ZERO
        } else {
            let secs = rand::rng().random_range(0.0..=self.max_jitter.as_secs_f64());
            Duration::from_secs_f64(secs)
        };
        self.backoff(attempt) + jitter
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent.
    ///
    /// `before_retry` is called with the error that triggered each retry,
    /// after the backoff sleep and before the next attempt.
    pub async fn run<T, Op, Fut, Hook>(
        &self,
        mut op: Op,
        mut before_retry: Hook,
    ) -> Result<T, FetchError>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
        Hook: FnMut(&FetchError),
    {
        let mut attempt = 0;
        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                return Err(err);
            }

            if attempt >= self.max_retries {
                warn!(
                    attempts = attempt + 1,
                    error = %err,
                    "giving up after exhausting retries"
                );
                return Err(err);
            }

            let delay = self.delay_for(attempt);
            warn!(
                retry = attempt + 1,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
            before_retry(&err);
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::navigation()
    }
}
