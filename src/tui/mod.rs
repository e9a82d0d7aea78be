//! Terminal dashboard for the spread monitor
//!
//! Opt-in via LOG_FORMAT=tui. Renders the latest published cycle snapshot
//! as a ranked table plus a scrollable log panel.
//!
//! # Usage
//! ```bash
//! LOG_FORMAT=tui cargo run --release
//! ```
//!
//! # Keyboard Controls
//! - `q` or `Ctrl+C`: Quit
//! - `↑/k` `↓/j`: Scroll logs
//! - `l`: Toggle DEBUG logs

pub mod app;
pub mod event;
pub mod logging;
pub mod ui;

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::EventStream;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio_util::sync::CancellationToken;

use crate::core::snapshot::SnapshotReceiver;

pub use app::{AppState, LogEntry, MAX_LOG_ENTRIES};
pub use event::EventResult;
pub use logging::{init_tui_logging, TuiLayer};

/// Redraw period when no key is pressed
const FRAME_INTERVAL: Duration = Duration::from_millis(200);

/// Drive the dashboard until the user quits or `shutdown` fires.
///
/// Quitting from the keyboard cancels `shutdown` so the rest of the
/// process stops with the dashboard.
pub async fn run_tui(
    app_state: Arc<Mutex<AppState>>,
    mut snapshots: SnapshotReceiver,
    shutdown: CancellationToken,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = tui_loop(&mut terminal, &app_state, &mut snapshots, &shutdown).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app_state: &Arc<Mutex<AppState>>,
    snapshots: &mut SnapshotReceiver,
    shutdown: &CancellationToken,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);

    loop {
        if shutdown.is_cancelled() {
            return Ok(());
        }

        let latest = snapshots.borrow_and_update().clone();
        if let Ok(mut state) = app_state.lock() {
            state.set_snapshot(latest);
            terminal.draw(|frame| ui::draw(frame, &state))?;
        }

        tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            _ = ticker.tick() => {}
            result = event::handle_events_async(app_state, shutdown, &mut events) => {
                if matches!(result, EventResult::Quit) {
                    return Ok(());
                }
            }
        }
    }
}
