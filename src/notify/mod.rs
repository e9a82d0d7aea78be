//! Outbound notifications and operator commands
//!
//! - `Notifier` trait used by the monitor for alerts
//! - Telegram implementation (`sendMessage` / `getUpdates`)
//! - Operator command parsing and the long-poll listener

pub mod commands;
pub mod errors;
pub mod listener;
pub mod telegram;
pub mod traits;

pub use commands::{handle_command, OperatorCommand};
pub use errors::{NotifyError, NotifyResult};
pub use listener::run_listener;
pub use telegram::{TelegramConfig, TelegramNotifier};
pub use traits::Notifier;
