//! Perp Spread Monitor
//!
//! Cross-venue price spread monitor for perpetual futures:
//! - Price sources for MEXC and LBank (REST polling)
//! - Symbol reconciliation, bounded concurrent fetching, spread ranking
//! - Telegram alerts with per-pair cooldown and operator commands
//! - HTTP API and optional terminal dashboard

pub mod adapters;
pub mod bin_utils;
pub mod config;
pub mod core;
pub mod error;
pub mod notify;
pub mod server;
pub mod tui;

pub use error::AppError;
