//! Symbol normalizer: exchange-native symbol → canonical base asset.
//!
//! Venues spell the same perpetual differently (`BTC_USDT`, `BTC-USDT`,
//! `BTC/USDT`, `BTCUSDT`). Normalization maps all of them to `BTC`.
//!
//! One pass applies, in order:
//! 1. replace `-` and `/` with `_`
//! 2. uppercase
//! 3. if the string contains `_`, keep the segment before the first `_`
//! 4. otherwise strip a known quote suffix (`USDT`)
//! 5. otherwise keep the whole string
//!
//! Passes repeat until the output stops changing, so overlapping formats
//! resolve deterministically (`ABCUSDT_USDT` → `ABCUSDT` → `ABC`) and
//! normalizing a canonical base is always a no-op.

use crate::core::types::SymbolEntry;

/// Quote currencies stripped from unseparated symbols
pub const QUOTE_SUFFIXES: &[&str] = &["USDT"];

/// Normalize a raw symbol to its canonical base. Pure and total.
///
/// A symbol made only of a quote currency (e.g. `"USDT"`) yields `""`.
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(raw: &str) -> String {
    let unified = raw.trim().replace(['-', '/'], "_").to_ascii_uppercase();

    if let Some((base, _)) = unified.split_once('_') {
        return base.to_string();
    }

    for suffix in QUOTE_SUFFIXES {
        if let Some(base) = unified.strip_suffix(suffix) {
            return base.to_string();
        }
    }

    unified
}

/// Build a `SymbolEntry`, dropping symbols whose base is empty.
pub fn to_entry(raw: &str) -> Option<SymbolEntry> {
    let canonical_base = normalize(raw);
    if canonical_base.is_empty() {
        return None;
    }
    Some(SymbolEntry {
        canonical_base,
        native_symbol: raw.to_string(),
    })
}

/// Normalize a whole symbol list, preserving input order.
pub fn normalize_all<S: AsRef<str>>(raws: &[S]) -> Vec<SymbolEntry> {
    raws.iter().filter_map(|raw| to_entry(raw.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_separator_formats() {
        assert_eq!(normalize("BTC_USDT"), "BTC");
        assert_eq!(normalize("BTC-USDT"), "BTC");
        assert_eq!(normalize("BTC/USDT"), "BTC");
        assert_eq!(normalize("eth-usdt-swap"), "ETH");
    }

    #[test]
    fn test_quote_suffix_stripped() {
        assert_eq!(normalize("BTCUSDT"), "BTC");
        assert_eq!(normalize("1000pepeusdt"), "1000PEPE");
    }

    #[test]
    fn test_bare_base_kept() {
        assert_eq!(normalize("SOL"), "SOL");
        assert_eq!(normalize("  sol "), "SOL");
    }

    #[test]
    fn test_quote_only_is_degenerate() {
        assert_eq!(normalize("USDT"), "");
        assert_eq!(normalize("_BTC"), "");
        assert!(to_entry("USDT").is_none());
        assert!(to_entry("").is_none());
    }

    #[test]
    fn test_overlapping_formats_resolve_to_fixpoint() {
        assert_eq!(normalize("ABCUSDT_USDT"), "ABC");
        assert_eq!(normalize("USDTUSDT"), "");
    }

    #[test]
    fn test_to_entry_keeps_native_symbol() {
        let entry = to_entry("btc/usdt").unwrap();
        assert_eq!(entry.canonical_base, "BTC");
        assert_eq!(entry.native_symbol, "btc/usdt");
    }

    #[test]
    fn test_normalize_all_drops_empty_and_keeps_order() {
        let entries = normalize_all(&["ETH_USDT", "USDT", "BTCUSDT"]);
        let bases: Vec<_> = entries.iter().map(|e| e.canonical_base.as_str()).collect();
        assert_eq!(bases, vec!["ETH", "BTC"]);
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in "[A-Za-z0-9_/ -]{0,16}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_entries_are_non_empty_uppercase(raw in "[A-Za-z0-9_/-]{0,16}") {
            if let Some(entry) = to_entry(&raw) {
                prop_assert!(!entry.canonical_base.is_empty());
                prop_assert_eq!(
                    entry.canonical_base.to_ascii_uppercase(),
                    entry.canonical_base.clone()
                );
            }
        }
    }
}
