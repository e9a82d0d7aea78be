//! Custom tracing Layer for TUI log capture
//!
//! Captures log events and pushes them to AppState for display.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use super::app::{AppState, LogEntry};

/// Tracks whether DEBUG logs are shown. Read without taking the AppState lock.
static SHOW_DEBUG: AtomicBool = AtomicBool::new(false);

/// Logs dropped due to lock contention, folded into
/// `AppState.dropped_logs_count` on the next successful lock.
static DROPPED_LOGS: AtomicU64 = AtomicU64::new(0);

/// Structured fields appended to the rendered message
const CAPTURED_FIELDS: [&str; 4] = ["event_type", "pair", "action", "error"];

/// Update the global DEBUG filter flag (called from event.rs when toggling).
pub fn set_show_debug(enabled: bool) {
    SHOW_DEBUG.store(enabled, Ordering::Relaxed);
}

/// Install the global subscriber for TUI mode.
///
/// Crate debug events pass the filter so they can be toggled on screen.
pub fn init_tui_logging(app_state: Arc<Mutex<AppState>>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,perp_spread_monitor=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(TuiLayer::new(app_state))
        .init();
}

/// Layer that captures logs for TUI display.
///
/// `on_event()` MUST use `try_lock()`, never `lock()`: events can fire
/// while the render loop holds the AppState lock. Dropped logs under
/// contention are counted instead.
pub struct TuiLayer {
    app_state: Arc<Mutex<AppState>>,
}

impl TuiLayer {
    pub fn new(app_state: Arc<Mutex<AppState>>) -> Self {
        Self { app_state }
    }
}

impl<S: Subscriber> Layer<S> for TuiLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = event.metadata().level();

        if *level == tracing::Level::DEBUG && !SHOW_DEBUG.load(Ordering::Relaxed) {
            return;
        }

        let mut message = String::new();
        let mut extra_fields = Vec::new();
        let mut visitor = MessageVisitor {
            message: &mut message,
            extra_fields: &mut extra_fields,
        };
        event.record(&mut visitor);

        if !extra_fields.is_empty() {
            message.push_str(" [");
            message.push_str(&extra_fields.join(", "));
            message.push(']');
        }

        let entry = LogEntry {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            level: level.to_string(),
            message,
        };

        match self.app_state.try_lock() {
            Ok(mut state) => {
                let dropped = DROPPED_LOGS.swap(0, Ordering::Relaxed);
                if dropped > 0 {
                    state.dropped_logs_count += dropped;
                }
                state.push_log(entry);
            }
            Err(_) => {
                DROPPED_LOGS.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Extracts the message and the captured structured fields
struct MessageVisitor<'a> {
    message: &'a mut String,
    extra_fields: &'a mut Vec<String>,
}

impl<'a> tracing::field::Visit for MessageVisitor<'a> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = format!("{:?}", value).trim_matches('"').to_string();
        } else if CAPTURED_FIELDS.contains(&field.name()) {
            self.extra_fields
                .push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.message = value.to_string();
        } else if CAPTURED_FIELDS.contains(&field.name()) {
            self.extra_fields.push(format!("{}={}", field.name(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::CycleSnapshot;
    use serial_test::serial;

    fn shared_state() -> Arc<Mutex<AppState>> {
        Arc::new(Mutex::new(AppState::new(
            Arc::new(CycleSnapshot::empty("mexc", "lbank", 3.0)),
            20,
        )))
    }

    #[test]
    #[serial]
    fn test_captures_message_and_fields() {
        let state = shared_state();
        let subscriber = tracing_subscriber::registry().with(TuiLayer::new(Arc::clone(&state)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(
                event_type = "SPREAD_ALERT",
                pair = "BTC",
                ignored = 5,
                "Spread alert sent"
            );
        });

        let state = state.lock().unwrap();
        assert_eq!(state.recent_logs.len(), 1);
        let entry = &state.recent_logs[0];
        assert_eq!(entry.level, "INFO");
        assert_eq!(
            entry.message,
            "Spread alert sent [event_type=SPREAD_ALERT, pair=BTC]"
        );
    }

    #[test]
    #[serial]
    fn test_debug_hidden_until_toggled() {
        let state = shared_state();
        let subscriber = tracing_subscriber::registry().with(TuiLayer::new(Arc::clone(&state)));

        tracing::subscriber::with_default(subscriber, || {
            set_show_debug(false);
            tracing::debug!("hidden");
            set_show_debug(true);
            tracing::debug!("shown");
            set_show_debug(false);
        });

        let state = state.lock().unwrap();
        assert_eq!(state.recent_logs.len(), 1);
        assert_eq!(state.recent_logs[0].message, "shown");
    }

    #[test]
    fn test_tui_layer_holds_shared_state() {
        let state = shared_state();
        let layer = TuiLayer::new(Arc::clone(&state));
        assert_eq!(Arc::strong_count(&layer.app_state), 2);
    }
}
