//! Price source factory for dynamic exchange selection
//!
//! Creates `PriceSource` instances from config strings.
//! Uses an enum-based dispatch pattern (no `Box<dyn>`) to preserve monomorphization.

use async_trait::async_trait;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::lbank::{LbankConfig, LbankSource};
use crate::adapters::mexc::{MexcConfig, MexcSource};
use crate::adapters::traits::PriceSource;
use crate::error::AppError;

// =============================================================================
// AnyPriceSource: enum-based dispatch for dynamic exchange selection
// =============================================================================

/// Enum wrapping all concrete price source types for runtime dispatch.
pub enum AnyPriceSource {
    Mexc(MexcSource),
    Lbank(LbankSource),
}

/// Macro to reduce boilerplate for delegating trait methods
macro_rules! delegate {
    ($self:expr, $method:ident ( $($arg:expr),* )) => {
        match $self {
            AnyPriceSource::Mexc(s) => s.$method($($arg),*),
            AnyPriceSource::Lbank(s) => s.$method($($arg),*),
        }
    };
    (await $self:expr, $method:ident ( $($arg:expr),* )) => {
        match $self {
            AnyPriceSource::Mexc(s) => s.$method($($arg),*).await,
            AnyPriceSource::Lbank(s) => s.$method($($arg),*).await,
        }
    };
}

#[async_trait]
impl PriceSource for AnyPriceSource {
    async fn get_symbols(&self) -> ExchangeResult<Vec<String>> {
        delegate!(await self, get_symbols())
    }

    async fn get_price(&self, symbol: &str) -> ExchangeResult<f64> {
        delegate!(await self, get_price(symbol))
    }

    fn exchange_name(&self) -> &'static str {
        delegate!(self, exchange_name())
    }
}

// =============================================================================
// Factory Functions
// =============================================================================

/// All supported exchange names.
pub const SUPPORTED_EXCHANGES: &[&str] = &["mexc", "lbank"];

/// Create a price source from a config name string.
///
/// Endpoints come from the environment (`MEXC_BASE_URL`, `LBANK_BASE_URL`).
/// An unknown name is a configuration mistake, never retried.
pub fn create_source(name: &str) -> Result<AnyPriceSource, AppError> {
    match name {
        "mexc" => Ok(AnyPriceSource::Mexc(MexcSource::new(MexcConfig::from_env()))),
        "lbank" => Ok(AnyPriceSource::Lbank(LbankSource::new(LbankConfig::from_env()))),
        _ => Err(AppError::Config(format!(
            "Unknown exchange: '{}'. Supported: {}",
            name,
            SUPPORTED_EXCHANGES.join(", ")
        ))),
    }
}
