//! Published cycle snapshot.
//!
//! The monitor builds a complete `CycleSnapshot` and swaps it into a
//! `watch` channel once per cycle. Readers (HTTP API, TUI, operator
//! commands) only ever see a whole snapshot behind an `Arc`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::core::history::SpreadHistory;
use crate::core::types::SpreadResult;

/// Placeholder for timestamps that were never set
pub const NOT_AVAILABLE: &str = "N/A";

/// Read handle shared by presentation tasks
pub type SnapshotReceiver = watch::Receiver<Arc<CycleSnapshot>>;

/// Immutable result of one monitoring cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleSnapshot {
    /// Ranked spread results (absolute spread descending)
    pub results: Vec<SpreadResult>,
    pub pairs_refreshed_at: Option<DateTime<Utc>>,
    pub prices_refreshed_at: Option<DateTime<Utc>>,
    /// Completed cycles since start (0 before the first one)
    pub cycle: u64,
    pub pair_count: usize,
    /// Pairs dropped this cycle because one side had no price
    pub quotes_skipped: usize,
    pub alerts_enabled: bool,
    pub armed_cooldowns: usize,
    pub exchange_a: String,
    pub exchange_b: String,
    pub threshold_percent: f64,
    #[serde(skip)]
    pub history: SpreadHistory,
}

impl CycleSnapshot {
    /// Snapshot shown before the first successful cycle
    pub fn empty(exchange_a: &str, exchange_b: &str, threshold_percent: f64) -> Self {
        Self {
            results: Vec::new(),
            pairs_refreshed_at: None,
            prices_refreshed_at: None,
            cycle: 0,
            pair_count: 0,
            quotes_skipped: 0,
            alerts_enabled: true,
            armed_cooldowns: 0,
            exchange_a: exchange_a.to_string(),
            exchange_b: exchange_b.to_string(),
            threshold_percent,
            history: SpreadHistory::default(),
        }
    }

    pub fn top(&self, n: usize) -> &[SpreadResult] {
        &self.results[..n.min(self.results.len())]
    }

    pub fn pairs_refreshed_label(&self) -> String {
        format_timestamp(self.pairs_refreshed_at)
    }

    pub fn prices_refreshed_label(&self) -> String {
        format_timestamp(self.prices_refreshed_at)
    }
}

/// `HH:MM:SS UTC`, or `N/A` when absent
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%H:%M:%S UTC").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Writer side of the snapshot channel, owned by the monitor.
#[derive(Debug)]
pub struct SnapshotStore {
    tx: watch::Sender<Arc<CycleSnapshot>>,
}

impl SnapshotStore {
    pub fn new(initial: CycleSnapshot) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// Replace the current snapshot in one step.
    pub fn publish(&self, snapshot: CycleSnapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> Arc<CycleSnapshot> {
        Arc::clone(&self.tx.borrow())
    }
}
