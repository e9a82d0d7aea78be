//! Pair matcher: intersects two exchanges' normalized symbol lists.

use std::collections::BTreeMap;

use crate::core::types::{CommonPair, SymbolEntry};

/// Build `canonical_base → native_symbol`; the first occurrence of a base wins.
fn index_by_base(entries: &[SymbolEntry]) -> BTreeMap<&str, &str> {
    let mut map = BTreeMap::new();
    for entry in entries {
        if entry.canonical_base.is_empty() {
            continue;
        }
        map.entry(entry.canonical_base.as_str())
            .or_insert(entry.native_symbol.as_str());
    }
    map
}

/// Intersect both lists into at most `max_pairs` common pairs.
///
/// Output is sorted by base asset ascending before truncation, so the same
/// inputs always produce the same pairs. Returns an empty list (not an
/// error) when either side is empty.
pub fn match_pairs(
    list_a: &[SymbolEntry],
    list_b: &[SymbolEntry],
    max_pairs: usize,
) -> Vec<CommonPair> {
    if list_a.is_empty() || list_b.is_empty() || max_pairs == 0 {
        return Vec::new();
    }

    let index_a = index_by_base(list_a);
    let index_b = index_by_base(list_b);

    // BTreeMap iteration is already ordered by base asset
    index_a
        .iter()
        .filter_map(|(base, symbol_a)| {
            index_b.get(base).map(|symbol_b| CommonPair {
                base_asset: (*base).to_string(),
                symbol_a: (*symbol_a).to_string(),
                symbol_b: (*symbol_b).to_string(),
            })
        })
        .take(max_pairs)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbols::normalize_all;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_mixed_formats_match_on_base() {
        let a = normalize_all(&["BTC_USDT", "ETH_USDT"]);
        let b = normalize_all(&["BTC/USDT", "SOL/USDT"]);

        let pairs = match_pairs(&a, &b, 10);
        assert_eq!(
            pairs,
            vec![CommonPair {
                base_asset: "BTC".into(),
                symbol_a: "BTC_USDT".into(),
                symbol_b: "BTC/USDT".into(),
            }]
        );
    }

    #[test]
    fn test_sorted_and_truncated() {
        let a = normalize_all(&["SOL_USDT", "BTC_USDT", "ETH_USDT", "ADA_USDT"]);
        let b = normalize_all(&["ETHUSDT", "ADAUSDT", "SOLUSDT", "BTCUSDT"]);

        let pairs = match_pairs(&a, &b, 3);
        let bases: Vec<_> = pairs.iter().map(|p| p.base_asset.as_str()).collect();
        assert_eq!(bases, vec!["ADA", "BTC", "ETH"]);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let a = normalize_all(&["BTC_USDT", "BTC-USDT-SWAP"]);
        let b = normalize_all(&["BTCUSDT"]);

        let pairs = match_pairs(&a, &b, 10);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].symbol_a, "BTC_USDT");
    }

    #[test]
    fn test_empty_inputs_yield_empty() {
        let a = normalize_all(&["BTC_USDT"]);
        assert!(match_pairs(&a, &[], 10).is_empty());
        assert!(match_pairs(&[], &a, 10).is_empty());
        assert!(match_pairs(&a, &a, 0).is_empty());
    }

    fn symbol_list() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[A-E]{1,2}(_USDT|USDT|/USDT)?", 0..12)
    }

    proptest! {
        #[test]
        fn prop_bounded_and_present_on_both_sides(
            raw_a in symbol_list(),
            raw_b in symbol_list(),
            max_pairs in 0usize..8,
        ) {
            let a = normalize_all(&raw_a);
            let b = normalize_all(&raw_b);
            let pairs = match_pairs(&a, &b, max_pairs);

            prop_assert!(pairs.len() <= max_pairs);
            for pair in &pairs {
                prop_assert!(a.iter().any(|e| e.canonical_base == pair.base_asset));
                prop_assert!(b.iter().any(|e| e.canonical_base == pair.base_asset));
            }
        }

        #[test]
        fn prop_commutative_over_bases(
            raw_a in symbol_list(),
            raw_b in symbol_list(),
            max_pairs in 0usize..8,
        ) {
            let a = normalize_all(&raw_a);
            let b = normalize_all(&raw_b);

            let ab = match_pairs(&a, &b, max_pairs);
            let ba = match_pairs(&b, &a, max_pairs);

            let bases_ab: BTreeSet<_> = ab.iter().map(|p| p.base_asset.clone()).collect();
            let bases_ba: BTreeSet<_> = ba.iter().map(|p| p.base_asset.clone()).collect();
            prop_assert_eq!(bases_ab, bases_ba);

            for (x, y) in ab.iter().zip(ba.iter()) {
                prop_assert_eq!(&x.symbol_a, &y.symbol_b);
                prop_assert_eq!(&x.symbol_b, &y.symbol_a);
            }
        }
    }
}
