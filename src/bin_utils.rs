//! Shared bootstrap utilities for binary entry points
//!
//! Both `perp_spread_monitor` and `pairs` load `.env`, read the YAML config
//! and build the two price sources the same way.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use crate::adapters::{create_source, AnyPriceSource};
use crate::config::{self, AppConfig};

/// Config file used when neither an argument nor `CONFIG_PATH` is given
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Config path: first CLI argument, then `CONFIG_PATH`, then `config.yaml`.
pub fn config_path() -> PathBuf {
    resolve_config_path(std::env::args().nth(1), std::env::var("CONFIG_PATH").ok())
}

fn resolve_config_path(arg: Option<String>, env: Option<String>) -> PathBuf {
    arg.or(env)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load `.env` and the YAML config. Logging is left to the caller so the
/// TUI can install its own subscriber first.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    let path = config_path();
    let cfg = config::load_config(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(cfg)
}

/// Initialize dotenv and logging only.
pub fn boot_minimal() {
    dotenvy::dotenv().ok();
    config::logging::init_logging();
}

/// Build the `dex_a` / `dex_b` price sources named in the config.
pub fn build_sources(cfg: &AppConfig) -> anyhow::Result<(AnyPriceSource, AnyPriceSource)> {
    let source_a = create_source(cfg.exchanges.dex_a.as_str())?;
    let source_b = create_source(cfg.exchanges.dex_b.as_str())?;
    info!(
        dex_a = %cfg.exchanges.dex_a,
        dex_b = %cfg.exchanges.dex_b,
        "Price sources ready"
    );
    Ok((source_a, source_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::PriceSource;
    use crate::config::load_config_from_str;
    use serial_test::serial;

    #[test]
    fn test_config_path_precedence() {
        assert_eq!(
            resolve_config_path(Some("cli.yaml".into()), Some("env.yaml".into())),
            PathBuf::from("cli.yaml")
        );
        assert_eq!(
            resolve_config_path(None, Some("env.yaml".into())),
            PathBuf::from("env.yaml")
        );
        assert_eq!(
            resolve_config_path(None, Some("  ".into())),
            PathBuf::from(DEFAULT_CONFIG_PATH)
        );
        assert_eq!(resolve_config_path(None, None), PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    #[serial]
    fn test_build_sources_logs_to_installed_subscriber() {
        use crate::core::snapshot::CycleSnapshot;
        use crate::tui::{AppState, TuiLayer};
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::layer::SubscriberExt;

        let cfg = load_config_from_str("exchanges:\n  dex_a: mexc\n  dex_b: lbank\n").unwrap();
        let state = Arc::new(Mutex::new(AppState::new(
            Arc::new(CycleSnapshot::empty("mexc", "lbank", 3.0)),
            10,
        )));
        let subscriber = tracing_subscriber::registry().with(TuiLayer::new(Arc::clone(&state)));

        tracing::subscriber::with_default(subscriber, || {
            build_sources(&cfg).unwrap();
        });

        let state = state.lock().unwrap();
        assert!(state
            .recent_logs
            .iter()
            .any(|entry| entry.message.starts_with("Price sources ready")));
    }

    #[test]
    fn test_build_sources_follows_config() {
        let cfg = load_config_from_str(
            "exchanges:\n  dex_a: lbank\n  dex_b: mexc\n",
        )
        .unwrap();
        let (a, b) = build_sources(&cfg).unwrap();
        assert_eq!(a.exchange_name(), "lbank");
        assert_eq!(b.exchange_name(), "mexc");
    }
}
