//! Bounded retry with linear backoff
//!
//! Installs are rare and low-volume, so the backoff is simply the attempt
//! number times a base delay: no exponent, no jitter.

use crate::error::{SetupError, SetupResult};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Retry budget and backoff base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; later retries wait a multiple of it
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay after the failed attempt with zero-based index `attempt`
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// Run `operation` up to `max_retries + 1` times
///
/// `operation` receives the zero-based attempt index. Errors rejected by
/// `is_retryable` are returned immediately. Once the budget is spent the last
/// error is returned as-is.
pub async fn retry_with<T, E, F, Fut, B, R>(
    max_retries: u32,
    backoff: B,
    is_retryable: R,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    B: Fn(u32) -> Duration,
    R: Fn(&E) -> bool,
{
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_retries || !is_retryable(&e) => return Err(e),
            Err(e) => {
                let delay = backoff(attempt);
                info!("Attempt {} failed, retrying in {:?}... ({})", attempt + 1, delay, e);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Retry a fallible setup step under `policy`
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, operation: F) -> SetupResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = SetupResult<T>>,
{
    let result = retry_with(
        policy.max_retries,
        |attempt| policy.delay_after(attempt),
        SetupError::is_retryable,
        operation,
    )
    .await;

    if let Err(e) = &result {
        if !e.is_retryable() {
            warn!("Not retrying: {}", e);
        }
    }
    result
}
