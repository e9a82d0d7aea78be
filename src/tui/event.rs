//! Async keyboard event handling for the dashboard
//!
//! Uses crossterm's EventStream so input never blocks a tokio worker.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyModifiers};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::app::AppState;

/// Result of processing a single event poll cycle
pub enum EventResult {
    /// Continue the TUI loop
    Continue,
    /// User requested quit
    Quit,
}

/// Poll for one keyboard event, giving up after a short timeout.
///
/// I/O errors are logged as warnings rather than silently swallowed.
pub async fn handle_events_async(
    app_state: &Arc<Mutex<AppState>>,
    shutdown: &CancellationToken,
    event_stream: &mut EventStream,
) -> EventResult {
    let maybe_event = tokio::time::timeout(Duration::from_millis(50), event_stream.next()).await;

    match maybe_event {
        Err(_) => EventResult::Continue,
        // Stream ended (terminal closed)
        Ok(None) => EventResult::Quit,
        Ok(Some(Err(e))) => {
            warn!(event_type = "TERMINAL_IO_ERROR", error = %e, "Terminal I/O error during event polling");
            EventResult::Continue
        }
        Ok(Some(Ok(Event::Key(key)))) => {
            process_key_event(key.code, key.modifiers, app_state, shutdown)
        }
        Ok(Some(Ok(_))) => EventResult::Continue,
    }
}

fn request_quit(app_state: &Arc<Mutex<AppState>>, shutdown: &CancellationToken) -> EventResult {
    if let Ok(mut state) = app_state.lock() {
        state.should_quit = true;
    }
    shutdown.cancel();
    EventResult::Quit
}

/// Process a single key event and update state accordingly
fn process_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    app_state: &Arc<Mutex<AppState>>,
    shutdown: &CancellationToken,
) -> EventResult {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => request_quit(app_state, shutdown),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            request_quit(app_state, shutdown)
        }

        // Scroll logs: j/k or arrows
        KeyCode::Char('j') | KeyCode::Down => {
            if let Ok(mut state) = app_state.lock() {
                state.log_scroll_offset = state.log_scroll_offset.saturating_sub(1);
            }
            EventResult::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Ok(mut state) = app_state.lock() {
                let max_offset = state.recent_logs.len().saturating_sub(1);
                if state.log_scroll_offset < max_offset {
                    state.log_scroll_offset += 1;
                }
            }
            EventResult::Continue
        }

        KeyCode::Char('l') | KeyCode::Char('L') => {
            if let Ok(mut state) = app_state.lock() {
                state.show_debug_logs = !state.show_debug_logs;
                super::logging::set_show_debug(state.show_debug_logs);
            }
            EventResult::Continue
        }

        _ => EventResult::Continue,
    }
}
