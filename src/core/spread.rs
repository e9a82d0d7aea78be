//! Spread engine
//!
//! Turns fetched price quotes into ranked spread results.
//!
//! # Formula
//! `spread_percent = (price_b - price_a) / price_a * 100`
//!
//! A positive spread means exchange B trades above exchange A. Values are
//! kept at full precision; rounding happens only in presentation.

use std::cmp::Ordering;

use crate::core::types::{PriceQuote, SpreadAction, SpreadResult};

/// Percentage spread between two prices. `None` when `price_a` is not a
/// positive finite number.
#[inline]
#[must_use]
pub fn spread_percent(price_a: f64, price_b: f64) -> Option<f64> {
    if !(price_a.is_finite() && price_a > 0.0 && price_b.is_finite()) {
        return None;
    }
    Some((price_b - price_a) / price_a * 100.0)
}

/// Label a spread against the alert threshold (inclusive on both sides).
#[inline]
pub fn classify(spread_percent: f64, threshold: f64) -> SpreadAction {
    if spread_percent >= threshold {
        SpreadAction::BuyASellB
    } else if spread_percent <= -threshold {
        SpreadAction::BuyBSellA
    } else {
        SpreadAction::None
    }
}

/// Compute and rank spreads for every resolvable quote.
///
/// Quotes missing either side are skipped. The result is ordered by
/// absolute spread descending, ties broken by base asset ascending.
pub fn compute_spreads(quotes: &[PriceQuote], threshold: f64) -> Vec<SpreadResult> {
    let mut results: Vec<SpreadResult> = quotes
        .iter()
        .filter_map(|quote| {
            let (price_a, price_b) = (quote.price_a?, quote.price_b?);
            let spread = spread_percent(price_a, price_b)?;
            Some(SpreadResult {
                base_asset: quote.pair.base_asset.clone(),
                symbol_a: quote.pair.symbol_a.clone(),
                symbol_b: quote.pair.symbol_b.clone(),
                price_a,
                price_b,
                spread_percent: spread,
                action: classify(spread, threshold),
            })
        })
        .collect();

    results.sort_by(rank_order);
    results
}

fn rank_order(x: &SpreadResult, y: &SpreadResult) -> Ordering {
    y.spread_percent
        .abs()
        .total_cmp(&x.spread_percent.abs())
        .then_with(|| x.base_asset.cmp(&y.base_asset))
}

/// Results whose action is not `None`, preserving rank order.
pub fn qualifying(results: &[SpreadResult]) -> impl Iterator<Item = &SpreadResult> {
    results.iter().filter(|r| r.action.is_actionable())
}

/// Human-readable alert text for one qualifying result.
pub fn format_alert(result: &SpreadResult, exchange_a: &str, exchange_b: &str) -> String {
    let (buy_on, sell_on) = match result.action {
        SpreadAction::BuyBSellA => (exchange_b, exchange_a),
        _ => (exchange_a, exchange_b),
    };
    format!(
        "Spread alert: {base}\n\
         {ex_a} {sym_a}: {price_a}\n\
         {ex_b} {sym_b}: {price_b}\n\
         Spread: {spread:+.2}%\n\
         Action: buy on {buy_on}, sell on {sell_on}",
        base = result.base_asset,
        ex_a = exchange_a.to_uppercase(),
        sym_a = result.symbol_a,
        price_a = result.price_a,
        ex_b = exchange_b.to_uppercase(),
        sym_b = result.symbol_b,
        price_b = result.price_b,
        spread = result.spread_percent,
        buy_on = buy_on.to_uppercase(),
        sell_on = sell_on.to_uppercase(),
    )
}
