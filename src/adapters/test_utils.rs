//! Shared test utilities for price source testing
//!
//! Provides a configurable `MockPriceSource` used by the fetcher, runtime
//! and trait test modules instead of per-module duplicates.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::PriceSource;

/// Scripted answer for one symbol
#[derive(Debug, Clone)]
pub enum MockQuote {
    Price(f64),
    Fail,
}

/// Unified mock price source for testing
///
/// Tracks in-flight and total calls so concurrency caps can be asserted.
pub struct MockPriceSource {
    /// Exchange name returned by `exchange_name()`
    pub name: &'static str,
    /// Symbol → scripted answer (insertion order kept for `get_symbols`)
    quotes: Mutex<Vec<(String, MockQuote)>>,
    /// When true, `get_symbols` returns an error
    pub symbols_fail: AtomicBool,
    /// Artificial latency for every `get_price` call
    pub delay: Duration,
    /// Per-symbol latency overrides
    slow_symbols: HashMap<String, Duration>,
    /// Number of `get_price` calls currently running
    in_flight: Arc<AtomicUsize>,
    /// Highest value `in_flight` ever reached
    pub max_in_flight: Arc<AtomicUsize>,
    /// Total number of `get_price` calls
    pub price_calls: Arc<AtomicUsize>,
}

impl MockPriceSource {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            quotes: Mutex::new(Vec::new()),
            symbols_fail: AtomicBool::new(false),
            delay: Duration::ZERO,
            slow_symbols: HashMap::new(),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            price_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_price(self, symbol: &str, price: f64) -> Self {
        self.set_quote(symbol, MockQuote::Price(price));
        self
    }

    pub fn with_failure(self, symbol: &str) -> Self {
        self.set_quote(symbol, MockQuote::Fail);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_slow_symbol(mut self, symbol: &str, delay: Duration) -> Self {
        self.slow_symbols.insert(symbol.to_string(), delay);
        self
    }

    /// Count in-flight calls together with `other`, so `max_in_flight`
    /// reports the combined peak of both sources.
    pub fn sharing_counters_with(mut self, other: &MockPriceSource) -> Self {
        self.in_flight = Arc::clone(&other.in_flight);
        self.max_in_flight = Arc::clone(&other.max_in_flight);
        self
    }

    /// Replace (or add) the scripted answer for a symbol
    pub fn set_quote(&self, symbol: &str, quote: MockQuote) {
        let mut quotes = self.quotes.lock().unwrap();
        match quotes.iter_mut().find(|(s, _)| s == symbol) {
            Some(entry) => entry.1 = quote,
            None => quotes.push((symbol.to_string(), quote)),
        }
    }

    pub fn set_price(&self, symbol: &str, price: f64) {
        self.set_quote(symbol, MockQuote::Price(price));
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn get_symbols(&self) -> ExchangeResult<Vec<String>> {
        if self.symbols_fail.load(Ordering::SeqCst) {
            return Err(ExchangeError::ConnectionFailed("mock symbols down".into()));
        }
        let quotes = self.quotes.lock().unwrap();
        Ok(quotes.iter().map(|(s, _)| s.clone()).collect())
    }

    async fn get_price(&self, symbol: &str) -> ExchangeResult<f64> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.slow_symbols.get(symbol).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let quote = {
            let quotes = self.quotes.lock().unwrap();
            quotes.iter().find(|(s, _)| s == symbol).map(|(_, q)| q.clone())
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match quote {
            Some(MockQuote::Price(p)) => Ok(p),
            Some(MockQuote::Fail) => Err(ExchangeError::InvalidResponse(format!(
                "mock failure for {}",
                symbol
            ))),
            None => Err(ExchangeError::UnknownSymbol(symbol.to_string())),
        }
    }

    fn exchange_name(&self) -> &'static str {
        self.name
    }
}
