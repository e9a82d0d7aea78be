//! Shared retry logic with exponential backoff
//!
//! Provides a bounded retry helper used by every price source.
//! Implements exponential backoff with jitter so concurrent lookups
//! against the same venue do not retry in lockstep.

use std::time::Duration;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

/// Maximum random jitter added to every backoff delay (milliseconds)
const MAX_JITTER_MS: u64 = 100;

/// Bounded retry policy for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds (doubles each retry)
    pub initial_delay_ms: u64,
    /// Maximum delay cap in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay_ms: 250,
            max_delay_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Base backoff (without jitter) before retry number `retry` (0-based)
    pub fn backoff_ms(&self, retry: u32) -> u64 {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        self.initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms)
    }
}

/// Run `op` until it succeeds, fails permanently, or attempts run out
///
/// Only errors for which `ExchangeError::is_transient()` is true are
/// retried; the first permanent error is returned immediately. When all
/// attempts fail, the LAST error is returned.
///
/// # Example
/// ```ignore
/// let price = retry_with_backoff(&policy, "mexc BTC_USDT", || async {
///     source.get_price("BTC_USDT").await
/// }).await?;
/// ```
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> ExchangeResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = ExchangeResult<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error: Option<ExchangeError> = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            let jitter = rand::random::<u64>() % MAX_JITTER_MS;
            let backoff_ms = policy.backoff_ms(attempt - 1) + jitter;
            tracing::debug!(
                target_label = %label,
                attempt = attempt + 1,
                max_attempts = attempts,
                backoff_ms = backoff_ms,
                "Retrying request"
            );
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => {
                tracing::debug!(
                    target_label = %label,
                    attempt = attempt + 1,
                    error = %e,
                    "Transient request failure"
                );
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ExchangeError::ConnectionFailed(format!("{}: retries exhausted", label))
    }))
}
