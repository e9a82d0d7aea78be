//! Exchange price sources
//!
//! This module provides the `PriceSource` abstraction and the REST
//! implementations for the supported perpetual-futures venues.

pub mod errors;
pub mod factory;
pub mod lbank;
pub mod mexc;
pub mod shared;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use errors::{ExchangeError, ExchangeResult};
pub use factory::{create_source, AnyPriceSource, SUPPORTED_EXCHANGES};
pub use lbank::{LbankConfig, LbankSource};
pub use mexc::{MexcConfig, MexcSource};
pub use shared::{retry_with_backoff, RetryPolicy};
pub use traits::PriceSource;
