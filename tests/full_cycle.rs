//! End-to-end monitoring cycle tests
//!
//! Drives `Monitor` through the public API with in-memory price sources and
//! a recording notifier:
//! 1. Symbol reconciliation and ranking
//! 2. Alert delivery and per-pair cooldown
//! 3. Per-pair failure isolation
//! 4. Empty match handling
//! 5. The background loop and the HTTP API reading the published snapshot
//!
//! # Running the tests
//! ```bash
//! cargo test --test full_cycle
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use perp_spread_monitor::adapters::{ExchangeError, ExchangeResult, PriceSource, RetryPolicy};
use perp_spread_monitor::core::{FetchConfig, Monitor, MonitorConfig, SpreadAction};
use perp_spread_monitor::error::AppError;
use perp_spread_monitor::notify::{Notifier, NotifyError, NotifyResult};
use perp_spread_monitor::server::{self, AppState};

// =============================================================================
// In-memory price source
// =============================================================================

/// Price source backed by a mutable symbol → price table
struct StaticSource {
    name: &'static str,
    symbols: Mutex<Vec<String>>,
    prices: Mutex<HashMap<String, f64>>,
}

impl StaticSource {
    fn new(name: &'static str, quotes: &[(&str, f64)]) -> Arc<Self> {
        Arc::new(Self {
            name,
            symbols: Mutex::new(quotes.iter().map(|(s, _)| s.to_string()).collect()),
            prices: Mutex::new(quotes.iter().map(|(s, p)| (s.to_string(), *p)).collect()),
        })
    }

    fn set_price(&self, symbol: &str, price: f64) {
        self.prices.lock().unwrap().insert(symbol.to_string(), price);
    }

    fn remove_price(&self, symbol: &str) {
        self.prices.lock().unwrap().remove(symbol);
    }
}

#[async_trait]
impl PriceSource for StaticSource {
    async fn get_symbols(&self) -> ExchangeResult<Vec<String>> {
        Ok(self.symbols.lock().unwrap().clone())
    }

    async fn get_price(&self, symbol: &str) -> ExchangeResult<f64> {
        self.prices
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .ok_or_else(|| ExchangeError::UnknownSymbol(symbol.to_string()))
    }

    fn exchange_name(&self) -> &'static str {
        self.name
    }
}

// =============================================================================
// Recording notifier
// =============================================================================

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl Recorder {
    fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for Recorder {
    async fn notify(&self, text: &str) -> NotifyResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected("HTTP 502".into()));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn config() -> MonitorConfig {
    MonitorConfig {
        check_interval: Duration::from_millis(20),
        pair_refresh_interval: Duration::from_secs(300),
        error_retry_delay: Duration::from_millis(20),
        max_pairs: 50,
        spread_threshold_percent: 3.0,
        alert_cooldown: Duration::from_secs(600),
        fetch: FetchConfig {
            concurrency_limit: 4,
            per_call_timeout: Duration::from_secs(2),
            retry: RetryPolicy::no_retry(),
        },
        history_capacity: 10,
        notify_cycle_errors: false,
    }
}

fn mexc() -> Arc<StaticSource> {
    StaticSource::new(
        "mexc",
        &[
            ("BTC_USDT", 100.0),
            ("ETH_USDT", 10.0),
            ("SOL_USDT", 50.0),
            ("DOGE_USDT", 0.1),
        ],
    )
}

fn lbank() -> Arc<StaticSource> {
    StaticSource::new(
        "lbank",
        &[
            ("BTCUSDT", 104.0),
            ("ETHUSDT", 9.5),
            ("SOLUSDT", 50.5),
            ("XRPUSDT", 0.5),
        ],
    )
}

type TestMonitor = Monitor<Arc<StaticSource>, Arc<StaticSource>, Arc<Recorder>>;

fn monitor(a: &Arc<StaticSource>, b: &Arc<StaticSource>, recorder: &Arc<Recorder>) -> TestMonitor {
    Monitor::new(Arc::clone(a), Arc::clone(b), Arc::clone(recorder), config())
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_cycle_ranks_common_pairs_and_alerts() {
    let (a, b) = (mexc(), lbank());
    let recorder = Arc::new(Recorder::default());
    let mut monitor = monitor(&a, &b, &recorder);

    let report = monitor.run_cycle().await.unwrap();
    assert_eq!(report.cycle, 1);
    assert_eq!(report.pair_count, 3);
    assert!(report.pairs_refreshed);
    assert_eq!(report.alerts_sent, 2);

    let snapshot = monitor.latest_snapshot();
    let order: Vec<&str> = snapshot.results.iter().map(|r| r.base_asset.as_str()).collect();
    assert_eq!(order, vec!["ETH", "BTC", "SOL"]);
    assert_eq!(snapshot.results[0].action, SpreadAction::BuyBSellA);
    assert_eq!(snapshot.results[1].action, SpreadAction::BuyASellB);
    assert_eq!(snapshot.results[2].action, SpreadAction::None);
    assert_ne!(snapshot.prices_refreshed_label(), "N/A");

    let messages = recorder.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("ETH"));
    assert!(messages[0].contains("Spread: -5.00%"));
    assert!(messages[0].contains("Action: buy on LBANK, sell on MEXC"));
    assert!(messages[1].contains("Spread: +4.00%"));
}

#[tokio::test]
async fn test_cooldown_blocks_repeat_alert_across_cycles() {
    let (a, b) = (mexc(), lbank());
    let recorder = Arc::new(Recorder::default());
    let mut monitor = monitor(&a, &b, &recorder);

    monitor.run_cycle().await.unwrap();
    assert_eq!(recorder.messages().len(), 2);

    // SOL now qualifies for the first time; BTC/ETH are still cooling down
    b.set_price("SOLUSDT", 53.0);
    let report = monitor.run_cycle().await.unwrap();

    assert_eq!(report.alerts_sent, 1);
    assert_eq!(report.alerts_suppressed, 2);
    let messages = recorder.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[2].contains("SOL"));
    assert_eq!(monitor.latest_snapshot().armed_cooldowns, 3);
}

#[tokio::test]
async fn test_failed_delivery_does_not_arm_cooldown() {
    let (a, b) = (mexc(), lbank());
    let recorder = Arc::new(Recorder::default());
    recorder.fail.store(true, Ordering::SeqCst);
    let mut monitor = monitor(&a, &b, &recorder);

    let report = monitor.run_cycle().await.unwrap();
    assert_eq!(report.notify_failures, 2);
    assert_eq!(monitor.latest_snapshot().armed_cooldowns, 0);

    recorder.fail.store(false, Ordering::SeqCst);
    let report = monitor.run_cycle().await.unwrap();
    assert_eq!(report.alerts_sent, 2);
}

#[tokio::test]
async fn test_paused_alerts_are_suppressed() {
    let (a, b) = (mexc(), lbank());
    let recorder = Arc::new(Recorder::default());
    let switch = Arc::new(AtomicBool::new(false));
    let mut monitor = monitor(&a, &b, &recorder).with_alert_switch(Arc::clone(&switch));

    let report = monitor.run_cycle().await.unwrap();
    assert_eq!(report.alerts_sent, 0);
    assert_eq!(report.alerts_suppressed, 2);
    assert!(recorder.messages().is_empty());
    assert!(!monitor.latest_snapshot().alerts_enabled);

    switch.store(true, Ordering::SeqCst);
    let report = monitor.run_cycle().await.unwrap();
    assert_eq!(report.alerts_sent, 2);
}

#[tokio::test]
async fn test_missing_price_skips_only_that_pair() {
    let (a, b) = (mexc(), lbank());
    let recorder = Arc::new(Recorder::default());
    b.remove_price("BTCUSDT");
    let mut monitor = monitor(&a, &b, &recorder);

    let report = monitor.run_cycle().await.unwrap();
    assert_eq!(report.pair_count, 3);
    assert_eq!(report.results, 2);
    assert_eq!(report.quotes_skipped, 1);

    let snapshot = monitor.latest_snapshot();
    assert!(snapshot.results.iter().all(|r| r.base_asset != "BTC"));
    assert_eq!(snapshot.quotes_skipped, 1);
}

#[tokio::test]
async fn test_empty_match_is_an_error_and_keeps_empty_snapshot() {
    let a = StaticSource::new("mexc", &[("BTC_USDT", 100.0)]);
    let b = StaticSource::new("lbank", &[("ETHUSDT", 10.0)]);
    let recorder = Arc::new(Recorder::default());
    let mut monitor = monitor(&a, &b, &recorder);

    let err = monitor.run_cycle().await.unwrap_err();
    assert!(matches!(err, AppError::EmptyMatch { .. }));
    assert_eq!(err.category(), "empty_match");

    let snapshot = monitor.latest_snapshot();
    assert_eq!(snapshot.cycle, 0);
    assert!(snapshot.results.is_empty());
    assert_eq!(snapshot.pairs_refreshed_label(), "N/A");
    assert_eq!(snapshot.prices_refreshed_label(), "N/A");
}

#[tokio::test]
async fn test_background_loop_feeds_http_api() {
    let (a, b) = (mexc(), lbank());
    let recorder = Arc::new(Recorder::default());
    let mut monitor = monitor(&a, &b, &recorder);
    let mut snapshots = monitor.subscribe();
    let shutdown = CancellationToken::new();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_stop = shutdown.clone();
    let server_handle = tokio::spawn(server::serve(
        listener,
        AppState {
            snapshots: snapshots.clone(),
            alerts_enabled: monitor.alert_switch(),
        },
        async move { server_stop.cancelled().await },
    ));

    let monitor_stop = shutdown.clone();
    let monitor_handle = tokio::spawn(async move {
        monitor.run(monitor_stop).await;
    });

    tokio::time::timeout(Duration::from_secs(5), snapshots.changed())
        .await
        .expect("first cycle published")
        .unwrap();

    let body: serde_json::Value = reqwest::get(format!("http://{}/api/spreads", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["cycle"].as_u64().unwrap() >= 1);
    assert_eq!(body["results"][0]["base_asset"], "ETH");
    assert_eq!(body["exchange_a"], "mexc");

    let history = reqwest::get(format!("http://{}/api/history/eth", addr))
        .await
        .unwrap();
    assert_eq!(history.status(), reqwest::StatusCode::OK);

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), monitor_handle)
        .await
        .expect("monitor stops on shutdown")
        .unwrap();
    server_handle.await.unwrap().unwrap();
}
