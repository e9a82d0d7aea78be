//! In-memory spread history for charting.
//!
//! One bounded ring per base asset; the oldest sample is evicted first.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::core::types::SpreadResult;

/// Default samples kept per asset
pub const DEFAULT_HISTORY_CAPACITY: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadSample {
    /// Unix epoch milliseconds
    pub timestamp: u64,
    pub spread_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpreadHistory {
    capacity: usize,
    series: HashMap<String, VecDeque<SpreadSample>>,
}

impl SpreadHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            series: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, base_asset: &str, sample: SpreadSample) {
        let capacity = self.capacity;
        let ring = self
            .series
            .entry(base_asset.to_string())
            .or_insert_with(|| VecDeque::with_capacity(capacity));
        while ring.len() >= capacity {
            ring.pop_front();
        }
        ring.push_back(sample);
    }

    /// Append one sample per result, all stamped `timestamp`.
    pub fn record_cycle(&mut self, results: &[SpreadResult], timestamp: u64) {
        for result in results {
            self.push(
                &result.base_asset,
                SpreadSample {
                    timestamp,
                    spread_percent: result.spread_percent,
                },
            );
        }
    }

    /// Samples for one asset, oldest first. `None` when never seen.
    pub fn samples(&self, base_asset: &str) -> Option<Vec<SpreadSample>> {
        self.series
            .get(base_asset)
            .map(|ring| ring.iter().copied().collect())
    }

    /// Drop series for assets that are no longer matched.
    pub fn retain_assets<'a>(&mut self, assets: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = assets.into_iter().collect();
        self.series.retain(|base, _| keep.contains(base.as_str()));
    }

    pub fn asset_count(&self) -> usize {
        self.series.len()
    }
}
