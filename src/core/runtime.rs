//! Monitor runtime
//!
//! `Monitor` drives the refresh cycle:
//! rebuild pairs → fetch prices → compute spreads → alert → publish.
//!
//! The monitor exclusively owns the cooldown tracker and the spread
//! history. Other tasks only see the published `CycleSnapshot` and the
//! shared alert switch.
//!
//! # Logging
//! - Structured events (CYCLE_COMPLETED, PAIRS_REFRESHED, SPREAD_ALERT, ...)
//! - A failed cycle never ends the loop; only the shutdown token does

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapters::traits::PriceSource;
use crate::config::AppConfig;
use crate::core::cooldown::AlertCooldownTracker;
use crate::core::events::{log_event, MonitorEvent};
use crate::core::fetcher::{fetch_all, FetchConfig};
use crate::core::history::{SpreadHistory, DEFAULT_HISTORY_CAPACITY};
use crate::core::matcher::match_pairs;
use crate::core::snapshot::{CycleSnapshot, SnapshotReceiver, SnapshotStore};
use crate::core::spread::{compute_spreads, format_alert, qualifying};
use crate::core::symbols::normalize_all;
use crate::core::types::{current_time_ms, CommonPair, SpreadResult};
use crate::error::{AppError, Result};
use crate::notify::Notifier;

// =============================================================================
// Configuration
// =============================================================================

/// Runtime parameters of the monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Sleep after a successful cycle
    pub check_interval: Duration,
    /// Rebuild the pair list when older than this (zero = every cycle)
    pub pair_refresh_interval: Duration,
    /// Sleep after a failed cycle
    pub error_retry_delay: Duration,
    pub max_pairs: usize,
    pub spread_threshold_percent: f64,
    pub alert_cooldown: Duration,
    pub fetch: FetchConfig,
    pub history_capacity: usize,
    /// Tell the operator when a failure streak starts
    pub notify_cycle_errors: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(10),
            pair_refresh_interval: Duration::from_secs(300),
            error_retry_delay: Duration::from_secs(5),
            max_pairs: 150,
            spread_threshold_percent: 3.0,
            alert_cooldown: Duration::from_secs(600),
            fetch: FetchConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            notify_cycle_errors: true,
        }
    }
}

impl MonitorConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        let m = &config.monitor;
        Self {
            check_interval: Duration::from_secs(m.check_interval_secs),
            pair_refresh_interval: Duration::from_secs(m.pair_refresh_interval_secs),
            error_retry_delay: Duration::from_secs(m.error_retry_delay_secs),
            max_pairs: m.max_pairs,
            spread_threshold_percent: m.spread_threshold_percent,
            alert_cooldown: Duration::from_secs(m.alert_cooldown_secs),
            fetch: FetchConfig {
                concurrency_limit: m.fetch_concurrency_limit,
                per_call_timeout: Duration::from_secs(m.per_call_timeout_secs),
                retry: config.retry.policy(),
            },
            history_capacity: m.history_capacity,
            notify_cycle_errors: true,
        }
    }
}

/// What one successful cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub pair_count: usize,
    pub pairs_refreshed: bool,
    pub results: usize,
    pub quotes_skipped: usize,
    pub alerts_sent: usize,
    pub alerts_suppressed: usize,
    pub notify_failures: usize,
    pub elapsed_ms: u64,
}

// =============================================================================
// Monitor
// =============================================================================

pub struct Monitor<A, B, N> {
    source_a: A,
    source_b: B,
    notifier: N,
    config: MonitorConfig,
    tracker: AlertCooldownTracker,
    history: SpreadHistory,
    pairs: Vec<CommonPair>,
    pairs_refreshed_at: Option<DateTime<Utc>>,
    pairs_refreshed_instant: Option<Instant>,
    last_results: Vec<SpreadResult>,
    prices_refreshed_at: Option<DateTime<Utc>>,
    quotes_skipped: usize,
    cycle: u64,
    alerts_enabled: Arc<AtomicBool>,
    store: SnapshotStore,
}

impl<A, B, N> Monitor<A, B, N>
where
    A: PriceSource,
    B: PriceSource,
    N: Notifier,
{
    pub fn new(source_a: A, source_b: B, notifier: N, config: MonitorConfig) -> Self {
        let initial = CycleSnapshot::empty(
            source_a.exchange_name(),
            source_b.exchange_name(),
            config.spread_threshold_percent,
        );
        Self {
            tracker: AlertCooldownTracker::new(config.alert_cooldown.as_millis() as u64),
            history: SpreadHistory::new(config.history_capacity),
            source_a,
            source_b,
            notifier,
            config,
            pairs: Vec::new(),
            pairs_refreshed_at: None,
            pairs_refreshed_instant: None,
            last_results: Vec::new(),
            prices_refreshed_at: None,
            quotes_skipped: 0,
            cycle: 0,
            alerts_enabled: Arc::new(AtomicBool::new(true)),
            store: SnapshotStore::new(initial),
        }
    }

    /// Share an externally owned alert switch (operator `/stop`, `/resume`)
    pub fn with_alert_switch(mut self, switch: Arc<AtomicBool>) -> Self {
        self.alerts_enabled = switch;
        self.publish_snapshot();
        self
    }

    pub fn alert_switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.alerts_enabled)
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.store.subscribe()
    }

    pub fn latest_snapshot(&self) -> Arc<CycleSnapshot> {
        self.store.latest()
    }

    pub fn pairs(&self) -> &[CommonPair] {
        &self.pairs
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn needs_pair_refresh(&self) -> bool {
        match self.pairs_refreshed_instant {
            None => true,
            Some(_) if self.pairs.is_empty() => true,
            Some(at) => at.elapsed() >= self.config.pair_refresh_interval,
        }
    }

    /// Rebuild the common pair list when it is missing or stale.
    ///
    /// Returns `Ok(true)` when a new list was installed. If a symbol list
    /// cannot be fetched while an older pair list exists, the older list is
    /// kept and `Ok(false)` returned.
    pub async fn refresh_pairs(&mut self) -> Result<bool> {
        if !self.needs_pair_refresh() {
            return Ok(false);
        }

        let (symbols_a, symbols_b) =
            tokio::join!(self.source_a.get_symbols(), self.source_b.get_symbols());

        let (symbols_a, symbols_b) = match (symbols_a, symbols_b) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(e), _) | (_, Err(e)) => {
                if self.pairs.is_empty() {
                    return Err(AppError::Exchange(e));
                }
                warn!(
                    error = %e,
                    pairs = self.pairs.len(),
                    "Symbol refresh failed, keeping previous pair list"
                );
                return Ok(false);
            }
        };

        let entries_a = normalize_all(&symbols_a);
        let entries_b = normalize_all(&symbols_b);
        let pairs = match_pairs(&entries_a, &entries_b, self.config.max_pairs);

        debug!(
            symbols_a = symbols_a.len(),
            symbols_b = symbols_b.len(),
            matched = pairs.len(),
            "Symbol lists reconciled"
        );

        if pairs.is_empty() {
            return Err(AppError::EmptyMatch {
                exchange_a: self.source_a.exchange_name().to_string(),
                exchange_b: self.source_b.exchange_name().to_string(),
            });
        }

        self.history
            .retain_assets(pairs.iter().map(|p| p.base_asset.as_str()));
        self.pairs = pairs;
        self.pairs_refreshed_at = Some(Utc::now());
        self.pairs_refreshed_instant = Some(Instant::now());
        log_event(&MonitorEvent::pairs_refreshed(self.pairs.len()));
        Ok(true)
    }

    /// Run one full cycle and publish the new snapshot.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let started = Instant::now();
        let pairs_refreshed = self.refresh_pairs().await?;

        let (quotes, _stats) = fetch_all(
            &self.source_a,
            &self.source_b,
            &self.pairs,
            &self.config.fetch,
        )
        .await;

        let threshold = self.config.spread_threshold_percent;
        let results = compute_spreads(&quotes, threshold);
        let quotes_skipped = quotes.len() - results.len();

        let now_ms = current_time_ms();
        let mut report = CycleReport {
            pair_count: self.pairs.len(),
            pairs_refreshed,
            results: results.len(),
            quotes_skipped,
            ..CycleReport::default()
        };

        self.dispatch_alerts(&results, now_ms, &mut report).await;
        self.tracker.prune(now_ms);
        self.history.record_cycle(&results, now_ms);

        self.cycle += 1;
        self.last_results = results;
        self.prices_refreshed_at = Some(Utc::now());
        self.quotes_skipped = quotes_skipped;
        self.publish_snapshot();

        report.cycle = self.cycle;
        report.elapsed_ms = started.elapsed().as_millis() as u64;
        log_event(&MonitorEvent::cycle_completed(
            report.cycle,
            report.pair_count,
            report.quotes_skipped,
            report.alerts_sent,
            report.elapsed_ms,
        ));
        Ok(report)
    }

    /// Notify for every qualifying result the tracker lets through. The
    /// cooldown is armed only after delivery succeeded.
    async fn dispatch_alerts(
        &mut self,
        results: &[SpreadResult],
        now_ms: u64,
        report: &mut CycleReport,
    ) {
        let alerts_enabled = self.alerts_enabled.load(Ordering::SeqCst);
        let notifier_enabled = self.notifier.is_enabled();
        let exchange_a = self.source_a.exchange_name();
        let exchange_b = self.source_b.exchange_name();

        for result in qualifying(results) {
            if !alerts_enabled {
                report.alerts_suppressed += 1;
                log_event(&MonitorEvent::alert_suppressed(
                    &result.base_asset,
                    result.spread_percent,
                    "alerts paused",
                ));
                continue;
            }

            if !notifier_enabled {
                report.alerts_suppressed += 1;
                log_event(&MonitorEvent::alert_suppressed(
                    &result.base_asset,
                    result.spread_percent,
                    "notifier disabled",
                ));
                continue;
            }

            let key = result.key();
            if !self.tracker.should_alert(&key, now_ms) {
                report.alerts_suppressed += 1;
                log_event(&MonitorEvent::alert_suppressed(
                    &result.base_asset,
                    result.spread_percent,
                    "cooldown",
                ));
                continue;
            }

            let text = format_alert(result, exchange_a, exchange_b);
            match self.notifier.notify(&text).await {
                Ok(()) => {
                    self.tracker.record_alert(&key, now_ms);
                    report.alerts_sent += 1;
                    log_event(&MonitorEvent::spread_alert(
                        &result.base_asset,
                        result.spread_percent,
                        self.config.spread_threshold_percent,
                        &result.action.to_string(),
                    ));
                }
                Err(e) => {
                    report.notify_failures += 1;
                    log_event(&MonitorEvent::notify_failed(&result.base_asset, &e.to_string()));
                }
            }
        }
    }

    fn publish_snapshot(&self) {
        let now_ms = current_time_ms();
        let snapshot = CycleSnapshot {
            results: self.last_results.clone(),
            pairs_refreshed_at: self.pairs_refreshed_at,
            prices_refreshed_at: self.prices_refreshed_at,
            cycle: self.cycle,
            pair_count: self.pairs.len(),
            quotes_skipped: self.quotes_skipped,
            alerts_enabled: self.alerts_enabled.load(Ordering::SeqCst),
            armed_cooldowns: self.tracker.armed_count(now_ms),
            exchange_a: self.source_a.exchange_name().to_string(),
            exchange_b: self.source_b.exchange_name().to_string(),
            threshold_percent: self.config.spread_threshold_percent,
            history: self.history.clone(),
        };
        self.store.publish(snapshot);
    }

    /// Cycle until `shutdown` fires.
    ///
    /// After a success the loop sleeps `check_interval`; after a failure it
    /// logs, optionally tells the operator (first failure of a streak only)
    /// and sleeps `error_retry_delay`.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        log_event(&MonitorEvent::monitor_started());
        info!(
            exchange_a = self.source_a.exchange_name(),
            exchange_b = self.source_b.exchange_name(),
            threshold = self.config.spread_threshold_percent,
            interval_s = self.config.check_interval.as_secs_f64(),
            "Spread monitor running"
        );

        let mut consecutive_failures: u32 = 0;

        loop {
            let outcome = tokio::select! {
                _ = shutdown.cancelled() => break,
                outcome = self.run_cycle() => outcome,
            };

            let delay = match outcome {
                Ok(_) => {
                    consecutive_failures = 0;
                    self.config.check_interval
                }
                Err(e) => {
                    consecutive_failures += 1;
                    log_event(&MonitorEvent::cycle_failed(self.cycle + 1, &e.to_string()));
                    if consecutive_failures == 1
                        && self.config.notify_cycle_errors
                        && self.notifier.is_enabled()
                    {
                        let text = format!("Monitor error ({}): {}", e.category(), e);
                        if let Err(notify_err) = self.notifier.notify(&text).await {
                            debug!(error = %notify_err, "Error notice not delivered");
                        }
                    }
                    self.config.error_retry_delay
                }
            };

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        log_event(&MonitorEvent::monitor_stopped(self.cycle));
    }
}
