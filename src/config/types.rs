//! Configuration types for the spread monitor
//!
//! This module defines all configuration structs that are loaded from YAML.
//! Every field except the exchange pair has a serde default, so a minimal
//! file only names the two venues.

use serde::{Deserialize, Serialize};

use crate::adapters::shared::RetryPolicy;
use crate::error::AppError;

// ============================================================================
// Enums
// ============================================================================

/// Supported exchanges
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    Mexc,
    Lbank,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Mexc => "mexc",
            Exchange::Lbank => "lbank",
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Defaults
// ============================================================================

fn default_check_interval_secs() -> u64 {
    10
}
fn default_pair_refresh_interval_secs() -> u64 {
    300
}
fn default_error_retry_delay_secs() -> u64 {
    5
}
fn default_max_pairs() -> usize {
    150
}
fn default_spread_threshold_percent() -> f64 {
    3.0
}
fn default_alert_cooldown_secs() -> u64 {
    600
}
fn default_fetch_concurrency_limit() -> usize {
    10
}
fn default_per_call_timeout_secs() -> u64 {
    10
}
fn default_history_capacity() -> usize {
    120
}
fn default_max_attempts() -> u32 {
    2
}
fn default_initial_delay_ms() -> u64 {
    250
}
fn default_max_delay_ms() -> u64 {
    2_000
}
fn default_port() -> u16 {
    10_000
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// The two venues being compared. Spread sign is `dex_b` relative to `dex_a`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangesConfig {
    pub dex_a: Exchange,
    pub dex_b: Exchange,
}

/// Monitoring loop parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Sleep after a successful cycle (seconds)
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    /// Rebuild the pair list when older than this (0 = every cycle)
    #[serde(default = "default_pair_refresh_interval_secs")]
    pub pair_refresh_interval_secs: u64,
    /// Sleep after a failed cycle (seconds)
    #[serde(default = "default_error_retry_delay_secs")]
    pub error_retry_delay_secs: u64,
    #[serde(default = "default_max_pairs")]
    pub max_pairs: usize,
    /// Absolute spread (percent) that triggers an alert, e.g. 3.0 = 3%
    #[serde(default = "default_spread_threshold_percent")]
    pub spread_threshold_percent: f64,
    #[serde(default = "default_alert_cooldown_secs")]
    pub alert_cooldown_secs: u64,
    /// Maximum in-flight price lookups across both exchanges
    #[serde(default = "default_fetch_concurrency_limit")]
    pub fetch_concurrency_limit: usize,
    #[serde(default = "default_per_call_timeout_secs")]
    pub per_call_timeout_secs: u64,
    /// Samples kept per asset for charting
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval_secs(),
            pair_refresh_interval_secs: default_pair_refresh_interval_secs(),
            error_retry_delay_secs: default_error_retry_delay_secs(),
            max_pairs: default_max_pairs(),
            spread_threshold_percent: default_spread_threshold_percent(),
            alert_cooldown_secs: default_alert_cooldown_secs(),
            fetch_concurrency_limit: default_fetch_concurrency_limit(),
            per_call_timeout_secs: default_per_call_timeout_secs(),
            history_capacity: default_history_capacity(),
        }
    }
}

/// Retry policy for individual price lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay_ms: self.initial_delay_ms,
            max_delay_ms: self.max_delay_ms,
        }
    }
}

/// HTTP API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `PORT` from the environment wins over the file value
    pub fn resolved_port(&self) -> u16 {
        std::env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(self.port)
    }
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub exchanges: ExchangesConfig,
    #[serde(default)]
    pub monitor: MonitorSettings,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Validate all configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        // Rule: dex_a ≠ dex_b
        if self.exchanges.dex_a == self.exchanges.dex_b {
            return Err(AppError::Config(format!(
                "dex_a and dex_b cannot be the same (both are {})",
                self.exchanges.dex_a
            )));
        }

        let m = &self.monitor;

        // Rule: threshold in (0, 100)
        if !(m.spread_threshold_percent > 0.0 && m.spread_threshold_percent < 100.0) {
            return Err(AppError::Config(format!(
                "spread_threshold_percent must be > 0 and < 100 (got {})",
                m.spread_threshold_percent
            )));
        }

        if m.max_pairs == 0 {
            return Err(AppError::Config("max_pairs must be >= 1".to_string()));
        }

        if m.fetch_concurrency_limit == 0 {
            return Err(AppError::Config(
                "fetch_concurrency_limit must be >= 1".to_string(),
            ));
        }

        if m.check_interval_secs == 0 {
            return Err(AppError::Config(
                "check_interval_secs must be > 0".to_string(),
            ));
        }

        if m.error_retry_delay_secs == 0 {
            return Err(AppError::Config(
                "error_retry_delay_secs must be > 0".to_string(),
            ));
        }

        if m.per_call_timeout_secs == 0 {
            return Err(AppError::Config(
                "per_call_timeout_secs must be > 0".to_string(),
            ));
        }

        if m.history_capacity == 0 {
            return Err(AppError::Config("history_capacity must be >= 1".to_string()));
        }

        if self.retry.max_attempts == 0 {
            return Err(AppError::Config(
                "retry.max_attempts must be >= 1".to_string(),
            ));
        }

        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(AppError::Config(format!(
                "retry.initial_delay_ms ({}) must be <= retry.max_delay_ms ({})",
                self.retry.initial_delay_ms, self.retry.max_delay_ms
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config() -> AppConfig {
        AppConfig {
            exchanges: ExchangesConfig {
                dex_a: Exchange::Mexc,
                dex_b: Exchange::Lbank,
            },
            monitor: MonitorSettings::default(),
            retry: RetryConfig::default(),
            server: ServerConfig::default(),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = config();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.check_interval_secs, 10);
        assert_eq!(config.monitor.alert_cooldown_secs, 600);
        assert_eq!(config.monitor.spread_threshold_percent, 3.0);
        assert!(config.monitor.error_retry_delay_secs < config.monitor.check_interval_secs);
    }

    #[test]
    fn test_same_exchange_rejected() {
        let mut config = config();
        config.exchanges.dex_b = Exchange::Mexc;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("cannot be the same"));
    }

    #[test]
    fn test_threshold_bounds() {
        for bad in [0.0, -1.0, 100.0, f64::NAN] {
            let mut config = config();
            config.monitor.spread_threshold_percent = bad;
            assert!(config.validate().is_err(), "threshold {} accepted", bad);
        }
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = config();
        config.monitor.fetch_concurrency_limit = 0;
        assert!(config.validate().is_err());

        let mut config = self::config();
        config.monitor.max_pairs = 0;
        assert!(config.validate().is_err());

        let mut config = self::config();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_policy_conversion() {
        let policy = RetryConfig::default().policy();
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    #[serial]
    fn test_port_env_override() {
        let server = ServerConfig { port: 8080 };
        std::env::set_var("PORT", "9090");
        assert_eq!(server.resolved_port(), 9090);
        std::env::set_var("PORT", "not-a-port");
        assert_eq!(server.resolved_port(), 8080);
        std::env::remove_var("PORT");
        assert_eq!(server.resolved_port(), 8080);
    }

    #[test]
    fn test_exchange_display() {
        assert_eq!(Exchange::Mexc.to_string(), "mexc");
        assert_eq!(Exchange::Lbank.as_str(), "lbank");
    }
}
