//! Core module - symbol reconciliation, price fetching, spreads, alerting
//!
//! # Module Architecture
//!
//! This module uses **explicit re-exports** instead of glob exports (`pub use module::*`)
//! to provide better API visibility and prevent accidental public API changes.
//!
//! ## Usage
//! Prefer importing from `crate::core`:
//! ```ignore
//! use crate::core::{Monitor, MonitorConfig, CycleSnapshot};
//! ```

pub mod cooldown;
pub mod events;
pub mod fetcher;
pub mod history;
pub mod matcher;
pub mod runtime;
pub mod snapshot;
pub mod spread;
pub mod symbols;
pub mod types;

// Explicit re-exports for types module
pub use types::{CommonPair, PriceQuote, SpreadAction, SpreadResult, SymbolEntry};

// Explicit re-exports for the pipeline stages
pub use cooldown::AlertCooldownTracker;
pub use fetcher::{fetch_all, FetchConfig, FetchStats};
pub use matcher::match_pairs;
pub use spread::{classify, compute_spreads, spread_percent};
pub use symbols::{normalize, normalize_all};

// Explicit re-exports for runtime and publication
pub use history::{SpreadHistory, SpreadSample};
pub use runtime::{CycleReport, Monitor, MonitorConfig};
pub use snapshot::{CycleSnapshot, SnapshotReceiver, SnapshotStore};

// Explicit re-exports for events module
pub use events::{log_event, MonitorEvent, MonitorEventType};
