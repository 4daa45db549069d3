use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, warn};

use crate::error::AppError;

/// Retries operations that failed on storage I/O. Every other error kind is
/// returned on the first attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// One retry after `backoff`.
    pub fn storage(backoff: Duration) -> Self {
        Self::new(2, backoff)
    }

    fn delay(&self, attempt: usize) -> Duration {
        self.backoff.saturating_mul(2_u32.saturating_pow(attempt as u32))
    }

    pub async fn run<F, Fut, T>(&self, operation: &str, mut op: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(val) => return Ok(val),
                Err(err) if err.is_retryable() && attempt + 1 < self.max_attempts => {
                    let delay = self.delay(attempt);
                    warn!(operation, attempt, ?delay, "storage failure, retrying: {}", err);
                    attempt += 1;
                    sleep(delay).await;
                }
                Err(err) => {
                    if err.is_retryable() {
                        error!(operation, "storage failure after {} attempts: {}", attempt + 1, err);
                    }
                    return Err(err);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::storage(Duration::from_millis(200))
    }
}
