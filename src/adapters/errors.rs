//! Exchange adapter error types
//!
//! All price-source failures are wrapped in ExchangeError
//! which implements thiserror for consistent error handling.

use thiserror::Error;

/// Exchange-specific error types for price source operations
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Connection to exchange failed (DNS, TLS, refused, reset)
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Network operation timed out
    #[error("Network timeout after {0}ms")]
    NetworkTimeout(u64),

    /// Exchange answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Invalid or unexpected response from exchange
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Price was parsed but is zero, negative, NaN or infinite
    #[error("Invalid price for {symbol}: {price}")]
    InvalidPrice { symbol: String, price: f64 },

    /// Exchange does not know the requested symbol
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
}

impl ExchangeError {
    /// Whether retrying the same request may succeed.
    ///
    /// Connection failures, timeouts, rate limiting (429) and server errors
    /// (5xx) are transient. Malformed payloads and unknown symbols are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ExchangeError::ConnectionFailed(_) | ExchangeError::NetworkTimeout(_) => true,
            ExchangeError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            ExchangeError::InvalidResponse(_)
            | ExchangeError::InvalidPrice { .. }
            | ExchangeError::UnknownSymbol(_) => false,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::NetworkTimeout(0)
        } else if err.is_decode() {
            ExchangeError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ExchangeError::HttpStatus {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ExchangeError::ConnectionFailed(err.to_string())
        }
    }
}

/// Result type alias for exchange operations
pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;
