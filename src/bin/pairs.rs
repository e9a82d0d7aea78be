//! One-shot pair and spread listing
//!
//! Loads the config, runs a single monitoring cycle with notifications off
//! and prints the matched pairs followed by the ranked spread table.
//!
//! Usage: cargo run --bin pairs [config.yaml]

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use perp_spread_monitor::bin_utils::{boot_minimal, build_sources, load_app_config};
use perp_spread_monitor::core::{Monitor, MonitorConfig};
use perp_spread_monitor::notify::TelegramNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = load_app_config()?;
    boot_minimal();

    let (source_a, source_b) = build_sources(&cfg)?;
    let name_a = cfg.exchanges.dex_a.as_str().to_uppercase();
    let name_b = cfg.exchanges.dex_b.as_str().to_uppercase();

    let mut monitor = Monitor::new(
        source_a,
        source_b,
        TelegramNotifier::disabled(),
        MonitorConfig::from_app_config(&cfg),
    )
    .with_alert_switch(Arc::new(AtomicBool::new(false)));

    let report = monitor.run_cycle().await?;

    println!("=== Common pairs: {} vs {} ===", name_a, name_b);
    println!("{:<10} {:<20} {:<20}", "ASSET", name_a, name_b);
    for pair in monitor.pairs() {
        println!(
            "{:<10} {:<20} {:<20}",
            pair.base_asset, pair.symbol_a, pair.symbol_b
        );
    }
    println!();

    let snapshot = monitor.latest_snapshot();
    println!(
        "=== Spreads (threshold {:.2}%, {} priced, {} skipped, {} ms) ===",
        snapshot.threshold_percent, report.results, report.quotes_skipped, report.elapsed_ms
    );
    println!(
        "{:>4} {:<10} {:>16} {:>16} {:>9}  ACTION",
        "#", "ASSET", name_a, name_b, "SPREAD"
    );
    for (idx, result) in snapshot.results.iter().enumerate() {
        let marker = if result.action.is_actionable() { "*" } else { " " };
        println!(
            "{:>4} {:<10} {:>16.6} {:>16.6} {:>+8.2}%  {}{}",
            idx + 1,
            result.base_asset,
            result.price_a,
            result.price_b,
            result.spread_percent,
            marker,
            result.action
        );
    }
    println!();
    println!("Prices refreshed at {}", snapshot.prices_refreshed_label());

    Ok(())
}
