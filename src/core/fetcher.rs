//! Bounded concurrent price fetcher.
//!
//! Every pair needs two lookups (one per exchange). All lookups of a batch
//! are started together and admitted through one shared semaphore, so at
//! most `concurrency_limit` requests are in flight across the whole batch.
//! A lookup that errors, times out, or returns a non-positive price yields
//! `None` for that side only.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::shared::{retry_with_backoff, RetryPolicy};
use crate::adapters::traits::PriceSource;
use crate::adapters::types::validate_price;
use crate::core::types::{CommonPair, PriceQuote};

/// Default number of simultaneous in-flight lookups
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 10;
/// Default upper bound for one lookup, retries included
pub const DEFAULT_PER_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetcher settings
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum in-flight lookups across the whole batch (both exchanges)
    pub concurrency_limit: usize,
    /// Hard cap on one lookup including its retries
    pub per_call_timeout: Duration,
    /// Retry policy applied inside the timeout
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            per_call_timeout: DEFAULT_PER_CALL_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Counters for one fetched batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub lookups: usize,
    pub failures: usize,
    pub elapsed_ms: u64,
}

/// Fetch both prices for every pair. Output order matches `pairs`.
///
/// Never fails as a whole: the batch always runs to completion and failed
/// lookups show up as `None`.
pub async fn fetch_all<A, B>(
    source_a: &A,
    source_b: &B,
    pairs: &[CommonPair],
    config: &FetchConfig,
) -> (Vec<PriceQuote>, FetchStats)
where
    A: PriceSource + ?Sized,
    B: PriceSource + ?Sized,
{
    let started = Instant::now();
    let gate = Arc::new(Semaphore::new(config.concurrency_limit.max(1)));

    let lookups = pairs.iter().map(|pair| {
        let gate = Arc::clone(&gate);
        async move {
            let (price_a, price_b) = tokio::join!(
                lookup(source_a, &pair.symbol_a, &gate, config),
                lookup(source_b, &pair.symbol_b, &gate, config),
            );
            PriceQuote {
                pair: pair.clone(),
                price_a,
                price_b,
            }
        }
    });

    let quotes = join_all(lookups).await;

    let failures = quotes
        .iter()
        .map(|q| q.price_a.is_none() as usize + q.price_b.is_none() as usize)
        .sum();
    let stats = FetchStats {
        lookups: pairs.len() * 2,
        failures,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };

    debug!(
        pairs = pairs.len(),
        lookups = stats.lookups,
        failures = stats.failures,
        elapsed_ms = stats.elapsed_ms,
        "Price batch fetched"
    );

    (quotes, stats)
}

/// One guarded lookup: wait for a permit, then fetch under the timeout.
async fn lookup<S>(
    source: &S,
    symbol: &str,
    gate: &Semaphore,
    config: &FetchConfig,
) -> Option<f64>
where
    S: PriceSource + ?Sized,
{
    // The semaphore is never closed while the batch is alive
    let _permit = gate.acquire().await.ok()?;
    let exchange = source.exchange_name();
    let label = format!("{} {}", exchange, symbol);

    let attempt = retry_with_backoff(&config.retry, &label, || async move {
        let price = source.get_price(symbol).await?;
        validate_price(symbol, price)
    });

    let result: ExchangeResult<f64> =
        match tokio::time::timeout(config.per_call_timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(ExchangeError::NetworkTimeout(
                config.per_call_timeout.as_millis() as u64,
            )),
        };

    match result {
        Ok(price) => Some(price),
        Err(e) => {
            if e.is_transient() {
                warn!(exchange = exchange, symbol = symbol, error = %e, "Price lookup failed");
            } else {
                debug!(exchange = exchange, symbol = symbol, error = %e, "Price lookup rejected");
            }
            None
        }
    }
}
