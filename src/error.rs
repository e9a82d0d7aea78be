//! Application-wide error types using thiserror
//!
//! Errors from the exchange and notification layers are wrapped in
//! `AppError` so the monitor loop can log and classify every failure the
//! same way.

use thiserror::Error;

use crate::adapters::errors::ExchangeError;
use crate::notify::NotifyError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotifyError),

    #[error("No common pairs between {exchange_a} and {exchange_b}")]
    EmptyMatch {
        exchange_a: String,
        exchange_b: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Short category name used in logs and operator messages
    pub fn category(&self) -> &'static str {
        match self {
            AppError::EmptyMatch { .. } => "empty_match",
            AppError::Notification(_) => "notification",
            AppError::Config(_) => "config",
            _ => "unexpected",
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
