//! Core data types for the pair-reconciliation and spread pipeline.
//!
//! These types form the vocabulary shared by the matcher, fetcher, spread
//! engine, cooldown tracker and the published cycle snapshot.

use serde::{Deserialize, Serialize};

// =============================================================================
// Symbols and Pairs
// =============================================================================

/// One tradable instrument on one exchange.
///
/// `canonical_base` is non-empty ASCII-uppercase (guaranteed by
/// `symbols::to_entry`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Canonical base asset (e.g. "BTC")
    pub canonical_base: String,
    /// Exchange-native symbol used to query the venue again (e.g. "BTC_USDT")
    pub native_symbol: String,
}

/// Base asset listed on both exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommonPair {
    pub base_asset: String,
    /// Native symbol on exchange A
    pub symbol_a: String,
    /// Native symbol on exchange B
    pub symbol_b: String,
}

impl CommonPair {
    /// Cooldown key for this pair (`symbolA|symbolB`)
    pub fn key(&self) -> String {
        pair_key(&self.symbol_a, &self.symbol_b)
    }
}

/// Build the cooldown key from both native symbols.
#[inline]
pub fn pair_key(symbol_a: &str, symbol_b: &str) -> String {
    format!("{}|{}", symbol_a, symbol_b)
}

// =============================================================================
// Quotes and Spreads
// =============================================================================

/// Prices fetched for one pair in one cycle. `None` means that side failed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub pair: CommonPair,
    pub price_a: Option<f64>,
    pub price_b: Option<f64>,
}

impl PriceQuote {
    /// Both sides present and `price_a > 0`
    #[inline]
    pub fn is_resolvable(&self) -> bool {
        matches!((self.price_a, self.price_b), (Some(a), Some(_)) if a > 0.0)
    }
}

/// What the spread suggests doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadAction {
    /// Price is low on A and high on B: accumulate on A, offload on B
    BuyASellB,
    /// Price is low on B and high on A: accumulate on B, offload on A
    BuyBSellA,
    None,
}

impl SpreadAction {
    #[inline]
    pub fn is_actionable(&self) -> bool {
        !matches!(self, SpreadAction::None)
    }
}

impl std::fmt::Display for SpreadAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadAction::BuyASellB => write!(f, "BUY_A_SELL_B"),
            SpreadAction::BuyBSellA => write!(f, "BUY_B_SELL_A"),
            SpreadAction::None => write!(f, "NONE"),
        }
    }
}

/// Spread computed for one pair in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadResult {
    pub base_asset: String,
    pub symbol_a: String,
    pub symbol_b: String,
    pub price_a: f64,
    pub price_b: f64,
    /// `(price_b - price_a) / price_a * 100`, full precision
    pub spread_percent: f64,
    pub action: SpreadAction,
}

impl SpreadResult {
    pub fn key(&self) -> String {
        pair_key(&self.symbol_a, &self.symbol_b)
    }
}

// =============================================================================
// Utility
// =============================================================================

/// Get current time in milliseconds since epoch.
#[inline]
pub fn current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
