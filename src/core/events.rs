//! Monitor Event System
//!
//! Structured event types for logging monitor milestones. Every event
//! carries an `event_type` field so a JSON log stream can be filtered and
//! a cycle timeline reconstructed.
//!
//! # Event Types
//!
//! - **CycleCompleted**: One full refresh cycle finished
//! - **PairsRefreshed**: Common pair list rebuilt
//! - **SpreadAlert**: Notification delivered for a qualifying spread
//! - **AlertSuppressed**: Qualifying spread held back by cooldown or pause
//! - **NotifyFailed**: Notification delivery failed
//! - **CycleFailed**: Cycle aborted; loop retries after the short delay
//!
//! # Example
//!
//! ```ignore
//! use crate::core::events::{MonitorEvent, log_event};
//!
//! log_event(&MonitorEvent::spread_alert("BTC", 3.2, 3.0, "BUY_A_SELL_B"));
//! ```

use std::fmt;

use tracing::{debug, info, warn};

use crate::core::types::current_time_ms;

/// Monitor event types for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEventType {
    // Cycle Events
    CycleCompleted,
    CycleFailed,
    PairsRefreshed,

    // Alert Events
    SpreadAlert,
    AlertSuppressed,
    NotifyFailed,

    // System Events
    MonitorStarted,
    MonitorStopped,
}

impl fmt::Display for MonitorEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorEventType::CycleCompleted => write!(f, "CYCLE_COMPLETED"),
            MonitorEventType::CycleFailed => write!(f, "CYCLE_FAILED"),
            MonitorEventType::PairsRefreshed => write!(f, "PAIRS_REFRESHED"),
            MonitorEventType::SpreadAlert => write!(f, "SPREAD_ALERT"),
            MonitorEventType::AlertSuppressed => write!(f, "ALERT_SUPPRESSED"),
            MonitorEventType::NotifyFailed => write!(f, "NOTIFY_FAILED"),
            MonitorEventType::MonitorStarted => write!(f, "MONITOR_STARTED"),
            MonitorEventType::MonitorStopped => write!(f, "MONITOR_STOPPED"),
        }
    }
}

/// Monitor event with optional context fields
#[derive(Debug, Clone)]
pub struct MonitorEvent {
    pub event_type: MonitorEventType,
    pub timestamp_ms: u64,
    pub pair: Option<String>,
    pub spread: Option<f64>,
    pub spread_threshold: Option<f64>,
    pub action: Option<String>,
    pub cycle: Option<u64>,
    pub pair_count: Option<usize>,
    pub skipped: Option<usize>,
    pub alerts: Option<usize>,
    pub latency_ms: Option<u64>,
    pub reason: Option<String>,
}

impl MonitorEvent {
    /// Create a new event with the current timestamp
    pub fn new(event_type: MonitorEventType) -> Self {
        Self {
            event_type,
            timestamp_ms: current_time_ms(),
            pair: None,
            spread: None,
            spread_threshold: None,
            action: None,
            cycle: None,
            pair_count: None,
            skipped: None,
            alerts: None,
            latency_ms: None,
            reason: None,
        }
    }

    pub fn cycle_completed(
        cycle: u64,
        pair_count: usize,
        skipped: usize,
        alerts: usize,
        latency_ms: u64,
    ) -> Self {
        Self {
            cycle: Some(cycle),
            pair_count: Some(pair_count),
            skipped: Some(skipped),
            alerts: Some(alerts),
            latency_ms: Some(latency_ms),
            ..Self::new(MonitorEventType::CycleCompleted)
        }
    }

    pub fn cycle_failed(cycle: u64, reason: &str) -> Self {
        Self {
            cycle: Some(cycle),
            reason: Some(reason.to_string()),
            ..Self::new(MonitorEventType::CycleFailed)
        }
    }

    pub fn pairs_refreshed(pair_count: usize) -> Self {
        Self {
            pair_count: Some(pair_count),
            ..Self::new(MonitorEventType::PairsRefreshed)
        }
    }

    pub fn spread_alert(pair: &str, spread: f64, spread_threshold: f64, action: &str) -> Self {
        Self {
            pair: Some(pair.to_string()),
            spread: Some(spread),
            spread_threshold: Some(spread_threshold),
            action: Some(action.to_string()),
            ..Self::new(MonitorEventType::SpreadAlert)
        }
    }

    pub fn alert_suppressed(pair: &str, spread: f64, reason: &str) -> Self {
        Self {
            pair: Some(pair.to_string()),
            spread: Some(spread),
            reason: Some(reason.to_string()),
            ..Self::new(MonitorEventType::AlertSuppressed)
        }
    }

    pub fn notify_failed(pair: &str, reason: &str) -> Self {
        Self {
            pair: Some(pair.to_string()),
            reason: Some(reason.to_string()),
            ..Self::new(MonitorEventType::NotifyFailed)
        }
    }

    pub fn monitor_started() -> Self {
        Self::new(MonitorEventType::MonitorStarted)
    }

    pub fn monitor_stopped(cycle: u64) -> Self {
        Self {
            cycle: Some(cycle),
            ..Self::new(MonitorEventType::MonitorStopped)
        }
    }
}

/// Log an event using structured tracing fields
///
/// Suppressed alerts go to DEBUG (they repeat every cycle), failures to
/// WARN, everything else to INFO.
pub fn log_event(event: &MonitorEvent) {
    let event_type = event.event_type.to_string();
    let timestamp = event.timestamp_ms;

    // Format spreads with 4 decimal places
    let spread_str = event.spread.map(|s| format!("{:.4}%", s));
    let threshold_str = event.spread_threshold.map(|s| format!("{:.4}%", s));

    match event.event_type {
        MonitorEventType::AlertSuppressed => {
            debug!(
                event_type = %event_type,
                timestamp = timestamp,
                pair = ?event.pair,
                spread = ?spread_str,
                reason = ?event.reason,
                ""
            );
        }
        MonitorEventType::NotifyFailed | MonitorEventType::CycleFailed => {
            warn!(
                event_type = %event_type,
                timestamp = timestamp,
                pair = ?event.pair,
                cycle = ?event.cycle,
                reason = ?event.reason,
                ""
            );
        }
        _ => {
            info!(
                event_type = %event_type,
                timestamp = timestamp,
                pair = ?event.pair,
                spread = ?spread_str,
                spread_threshold = ?threshold_str,
                action = ?event.action,
                cycle = ?event.cycle,
                pair_count = ?event.pair_count,
                skipped = ?event.skipped,
                alerts = ?event.alerts,
                latency_ms = ?event.latency_ms,
                ""
            );
        }
    }
}
