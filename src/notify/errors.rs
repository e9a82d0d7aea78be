//! Notification error types

use thiserror::Error;

/// Errors raised while delivering an outbound message
#[derive(Error, Debug)]
pub enum NotifyError {
    /// No token or chat configured; nothing was sent
    #[error("Notifications disabled (TELEGRAM_TOKEN/CHAT_ID not set)")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered but refused the message
    #[error("Message rejected: {0}")]
    Rejected(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(NotifyError::Disabled.to_string().contains("disabled"));
        assert_eq!(
            NotifyError::Rejected("HTTP 400: chat not found".into()).to_string(),
            "Message rejected: HTTP 400: chat not found"
        );
    }
}
