//! Retry policy with exponential backoff.
//!
//! A failed attempt `k` (0-based) is followed by a delay of
//! `base_delay * 2^k` before attempt `k + 1`. After `max_attempts` failures
//! the last error is returned; there is never an extra attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{ClientError, ClientResult};
use crate::metrics::record_retry;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles every attempt.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let base_delay_ms: u64 = std::env::var("RECFINDER_RETRY_BASE_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1000);

        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    /// Delay to wait after failed attempt `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Execute an async operation with retry and no recovery hook.
pub async fn with_backoff<T, F, Fut>(config: &RetryConfig, operation: &str, op: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    with_backoff_when(config, operation, ClientError::is_retryable, op).await
}

/// Like [`with_backoff`], retrying errors that satisfy `should_retry`.
pub async fn with_backoff_when<T, P, F, Fut>(
    config: &RetryConfig,
    operation: &str,
    should_retry: P,
    op: F,
) -> ClientResult<T>
where
    P: Fn(&ClientError) -> bool,
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    with_retry_when(config, operation, should_retry, op, |_| {
        std::future::ready(Ok::<(), ClientError>(()))
    })
    .await
}

/// Execute an async operation with retry.
///
/// Only errors where [`ClientError::is_retryable`] holds are retried.
/// `before_retry` runs after a retryable failure and before the backoff
/// sleep; if it fails, its error is returned and no further attempt is
/// made.
pub async fn with_retry<T, F, Fut, H, HFut>(
    config: &RetryConfig,
    operation: &str,
    op: F,
    before_retry: H,
) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
    H: FnMut(u32) -> HFut,
    HFut: Future<Output = ClientResult<()>>,
{
    with_retry_when(config, operation, ClientError::is_retryable, op, before_retry).await
}

/// Like [`with_retry`], retrying errors that satisfy `should_retry`.
pub async fn with_retry_when<T, P, F, Fut, H, HFut>(
    config: &RetryConfig,
    operation: &str,
    should_retry: P,
    mut op: F,
    mut before_retry: H,
) -> ClientResult<T>
where
    P: Fn(&ClientError) -> bool,
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
    H: FnMut(u32) -> HFut,
    HFut: Future<Output = ClientResult<()>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 0..max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if should_retry(&e) && attempt + 1 < max_attempts => {
                let delay = config.delay_for_attempt(attempt);

                warn!(
                    operation = %operation,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Attempt failed, retrying: {}",
                    e
                );

                record_retry(operation);
                before_retry(attempt).await?;
                tokio::time::sleep(delay).await;
                last_error = Some(e);
            }
            Err(e) => {
                warn!(
                    operation = %operation,
                    attempt = attempt + 1,
                    "Attempt failed, giving up: {}",
                    e
                );
                return Err(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ClientError::invalid_response("retry loop exhausted")))
}
