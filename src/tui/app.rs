//! TUI Application State
//!
//! Shared state container for the dashboard.
//! Wrapped in Arc<Mutex<>> for sharing between the render loop and the
//! tracing layer.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use crate::core::snapshot::CycleSnapshot;
use crate::core::types::SpreadResult;

/// Maximum number of log entries to keep in memory
pub const MAX_LOG_ENTRIES: usize = 100;

/// Single log entry for display
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

/// Central application state shared between the TUI and the tracing layer
#[derive(Debug)]
pub struct AppState {
    /// Last snapshot copied from the watch channel
    pub snapshot: Arc<CycleSnapshot>,
    /// Maximum number of ranked rows rendered
    pub max_rows: usize,
    pub uptime_start: Instant,

    // Logs (ring buffer)
    pub recent_logs: VecDeque<LogEntry>,
    pub dropped_logs_count: u64,

    // Control
    pub should_quit: bool,
    pub log_scroll_offset: usize,
    pub show_debug_logs: bool,
}

impl AppState {
    pub fn new(initial: Arc<CycleSnapshot>, max_rows: usize) -> Self {
        Self {
            snapshot: initial,
            max_rows,
            uptime_start: Instant::now(),
            recent_logs: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            dropped_logs_count: 0,
            should_quit: false,
            log_scroll_offset: 0,
            show_debug_logs: false,
        }
    }

    pub fn set_snapshot(&mut self, snapshot: Arc<CycleSnapshot>) {
        self.snapshot = snapshot;
    }

    /// Rows to render, strongest spread first
    pub fn ranked_rows(&self) -> &[SpreadResult] {
        self.snapshot.top(self.max_rows)
    }

    /// Add a log entry with automatic rotation
    pub fn push_log(&mut self, entry: LogEntry) {
        if self.recent_logs.len() >= MAX_LOG_ENTRIES {
            self.recent_logs.pop_front();
        }
        self.recent_logs.push_back(entry);
    }

    /// Get formatted uptime string
    pub fn uptime_str(&self) -> String {
        let elapsed = self.uptime_start.elapsed();
        let hours = elapsed.as_secs() / 3600;
        let minutes = (elapsed.as_secs() % 3600) / 60;
        format!("{}h{:02}m", hours, minutes)
    }
}
