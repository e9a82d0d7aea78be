//! Perp Spread Monitor: service entry point
//!
//! Orchestrates:
//! 1. Config + logging initialization (JSON/pretty, or TUI capture layer)
//! 2. Price sources for `dex_a` / `dex_b`
//! 3. Telegram notifier + operator listener
//! 4. Monitor loop publishing cycle snapshots
//! 5. axum HTTP API server
//! 6. Ctrl+C (or `q` in the TUI) graceful shutdown

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use perp_spread_monitor::bin_utils::{build_sources, load_app_config};
use perp_spread_monitor::config::logging::{init_logging, is_tui_mode};
use perp_spread_monitor::core::{CycleSnapshot, Monitor, MonitorConfig};
use perp_spread_monitor::notify::{run_listener, Notifier, TelegramNotifier};
use perp_spread_monitor::server::{self, AppState};
use perp_spread_monitor::tui;

/// Ranked rows shown in the dashboard
const TUI_MAX_ROWS: usize = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // =========================================================================
    // 1. Config + logging
    // =========================================================================
    let cfg = load_app_config()?;

    let tui_state = if is_tui_mode() {
        let initial = CycleSnapshot::empty(
            cfg.exchanges.dex_a.as_str(),
            cfg.exchanges.dex_b.as_str(),
            cfg.monitor.spread_threshold_percent,
        );
        let state = Arc::new(Mutex::new(tui::AppState::new(
            Arc::new(initial),
            TUI_MAX_ROWS,
        )));
        tui::init_tui_logging(Arc::clone(&state));
        Some(state)
    } else {
        init_logging();
        None
    };

    // =========================================================================
    // 2. Sources, notifier, monitor
    // =========================================================================
    let (source_a, source_b) = build_sources(&cfg)?;
    let notifier = Arc::new(TelegramNotifier::from_env());
    let alerts_enabled = Arc::new(AtomicBool::new(true));

    let mut monitor = Monitor::new(
        source_a,
        source_b,
        Arc::clone(&notifier),
        MonitorConfig::from_app_config(&cfg),
    )
    .with_alert_switch(Arc::clone(&alerts_enabled));
    let snapshots = monitor.subscribe();

    let port = cfg.server.resolved_port();
    info!(
        dex_a = %cfg.exchanges.dex_a,
        dex_b = %cfg.exchanges.dex_b,
        threshold = cfg.monitor.spread_threshold_percent,
        max_pairs = cfg.monitor.max_pairs,
        port = port,
        "=== Perp Spread Monitor ==="
    );

    if notifier.is_enabled() {
        let text = format!(
            "Spread monitor started: {} vs {}, threshold {:.2}%",
            cfg.exchanges.dex_a.as_str().to_uppercase(),
            cfg.exchanges.dex_b.as_str().to_uppercase(),
            cfg.monitor.spread_threshold_percent
        );
        if let Err(e) = notifier.notify(&text).await {
            warn!(error = %e, "Startup message not delivered");
        }
    } else {
        warn!("Telegram notifier disabled (TELEGRAM_TOKEN/CHAT_ID not set)");
    }

    let shutdown = CancellationToken::new();

    // =========================================================================
    // 3. Background tasks
    // =========================================================================
    let monitor_token = shutdown.clone();
    let monitor_handle = tokio::spawn(async move {
        monitor.run(monitor_token).await;
    });

    let listener_handle = tokio::spawn(run_listener(
        Arc::clone(&notifier),
        snapshots.clone(),
        Arc::clone(&alerts_enabled),
        shutdown.clone(),
    ));

    let server_state = AppState {
        snapshots: snapshots.clone(),
        alerts_enabled: Arc::clone(&alerts_enabled),
    };
    let server_token = shutdown.clone();
    let server_handle = tokio::spawn(async move {
        let stop = server_token.clone();
        if let Err(e) =
            server::start_server(server_state, port, async move { stop.cancelled().await }).await
        {
            error!(error = %e, "HTTP server failed");
        }
    });

    let tui_handle = tui_state.map(|state| {
        let token = shutdown.clone();
        let rx = snapshots.clone();
        tokio::spawn(async move {
            if let Err(e) = tui::run_tui(state, rx, token.clone()).await {
                error!(error = %e, "TUI failed");
                token.cancel();
            }
        })
    });

    // =========================================================================
    // 4. Wait for Ctrl+C or TUI quit → graceful shutdown
    // =========================================================================
    info!("Press Ctrl+C to shutdown");
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for Ctrl+C");
            }
            info!("Shutdown signal received");
        }
        _ = shutdown.cancelled() => {
            info!("Shutdown requested from dashboard");
        }
    }
    shutdown.cancel();

    let _ = monitor_handle.await;
    let _ = listener_handle.await;
    let _ = server_handle.await;
    if let Some(handle) = tui_handle {
        let _ = handle.await;
    }

    info!("=== Shutdown complete ===");
    Ok(())
}
