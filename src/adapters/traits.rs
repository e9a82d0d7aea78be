//! Price source trait definition
//!
//! The PriceSource trait is the only capability the spread engine needs
//! from an exchange: list the tradable perpetual symbols, and fetch the
//! latest traded price of one of them.

use async_trait::async_trait;

use crate::adapters::errors::ExchangeResult;

/// Common trait for all exchange price sources
///
/// Implementations are expected to be unreliable and rate-limited; callers
/// never assume success and isolate failures per call.
///
/// # Example Implementation
///
/// ```ignore
/// use async_trait::async_trait;
///
/// struct StaticSource;
///
/// #[async_trait]
/// impl PriceSource for StaticSource {
///     async fn get_symbols(&self) -> ExchangeResult<Vec<String>> {
///         Ok(vec!["BTC_USDT".into()])
///     }
///     async fn get_price(&self, _symbol: &str) -> ExchangeResult<f64> {
///         Ok(64_000.0)
///     }
///     fn exchange_name(&self) -> &'static str {
///         "static"
///     }
/// }
/// ```
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// List every exchange-native perpetual symbol currently tradable
    /// (e.g. "BTC_USDT" on MEXC, "BTCUSDT" on LBank).
    async fn get_symbols(&self) -> ExchangeResult<Vec<String>>;

    /// Fetch the latest price for one exchange-native symbol.
    ///
    /// Must return `Err` rather than a zero, negative or non-finite price.
    async fn get_price(&self, symbol: &str) -> ExchangeResult<f64>;

    /// Get the exchange name identifier (e.g. "mexc", "lbank")
    fn exchange_name(&self) -> &'static str;
}

#[async_trait]
impl<T: PriceSource + ?Sized> PriceSource for std::sync::Arc<T> {
    async fn get_symbols(&self) -> ExchangeResult<Vec<String>> {
        (**self).get_symbols().await
    }

    async fn get_price(&self, symbol: &str) -> ExchangeResult<f64> {
        (**self).get_price(symbol).await
    }

    fn exchange_name(&self) -> &'static str {
        (**self).exchange_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::errors::ExchangeError;
    use crate::adapters::test_utils::MockPriceSource;

    #[tokio::test]
    async fn test_mock_source_lists_symbols() {
        let source = MockPriceSource::new("mock")
            .with_price("BTC_USDT", 100.0)
            .with_price("ETH_USDT", 10.0);

        let mut symbols = source.get_symbols().await.unwrap();
        symbols.sort();
        assert_eq!(symbols, vec!["BTC_USDT".to_string(), "ETH_USDT".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_source_unknown_symbol() {
        let source = MockPriceSource::new("mock").with_price("BTC_USDT", 100.0);
        let err = source.get_price("DOGE_USDT").await.unwrap_err();
        assert!(matches!(err, ExchangeError::UnknownSymbol(_)));
    }

    #[tokio::test]
    async fn test_mock_source_exchange_name() {
        let source = MockPriceSource::new("mock");
        assert_eq!(source.exchange_name(), "mock");
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let source: Box<dyn PriceSource> =
            Box::new(MockPriceSource::new("boxed").with_price("SOL_USDT", 150.0));
        assert_eq!(source.get_price("SOL_USDT").await.unwrap(), 150.0);
    }
}
