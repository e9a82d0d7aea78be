//! Logging setup
//!
//! # Environment Variables
//! - `LOG_FORMAT`: `json` (default), `pretty`, or `tui`
//! - `RUST_LOG`: Log level filter (default: `info`)

use tracing_subscriber::EnvFilter;

/// Output format selected by `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Tui,
}

impl LogFormat {
    /// Unknown values fall back to JSON
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "tui" => LogFormat::Tui,
            _ => LogFormat::Json,
        }
    }

    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or(LogFormat::Json)
    }
}

/// True when LOG_FORMAT=tui. The caller then installs the TUI layer itself.
pub fn is_tui_mode() -> bool {
    LogFormat::from_env() == LogFormat::Tui
}

/// `RUST_LOG` filter, `info` when unset or invalid
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber for `json` / `pretty`.
///
/// Does nothing in TUI mode; `tui::init_tui_logging` owns the subscriber
/// there.
pub fn init_logging() {
    match LogFormat::from_env() {
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .pretty()
                .init();
        }
        LogFormat::Tui => {}
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .json()
                .init();
        }
    }
}
