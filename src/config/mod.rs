//! Configuration module
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `MonitorSettings`, `RetryConfig`, `ServerConfig`)
//! - YAML loading functionality (`load_config`)
//! - Logging setup driven by `LOG_FORMAT` / `RUST_LOG`

pub mod logging;
mod loader;
mod types;

// Re-export types
pub use types::{
    AppConfig, Exchange, ExchangesConfig, MonitorSettings, RetryConfig, ServerConfig,
};

// Re-export loader functions
pub use loader::{load_config, load_config_from_str};
