//! LBank Price Source Implementation
//!
//! Public REST endpoints of the LBank perpetual API (`productGroup=SwapU`).

use async_trait::async_trait;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::PriceSource;
use crate::adapters::types::{create_http_client, get_json, validate_price};

use super::config::{LbankConfig, PRODUCT_GROUP};
use super::types::{LbankInstrument, LbankMarketData, LbankResponse};

/// LBank perpetual market data source
pub struct LbankSource {
    config: LbankConfig,
    http: reqwest::Client,
}

impl LbankSource {
    pub fn new(config: LbankConfig) -> Self {
        Self {
            config,
            http: create_http_client("lbank"),
        }
    }
}

#[async_trait]
impl PriceSource for LbankSource {
    async fn get_symbols(&self) -> ExchangeResult<Vec<String>> {
        let request = self
            .http
            .get(self.config.instruments_url())
            .query(&[("productGroup", PRODUCT_GROUP)]);
        let resp: LbankResponse<Vec<LbankInstrument>> = get_json(request).await?;

        let symbols: Vec<String> = resp.into_data()?.into_iter().map(|i| i.symbol).collect();
        tracing::debug!(exchange = "lbank", count = symbols.len(), "Instrument list fetched");
        Ok(symbols)
    }

    async fn get_price(&self, symbol: &str) -> ExchangeResult<f64> {
        let request = self
            .http
            .get(self.config.market_data_url())
            .query(&[("productGroup", PRODUCT_GROUP), ("symbol", symbol)]);
        let resp: LbankResponse<Vec<LbankMarketData>> = get_json(request).await?;

        // The endpoint may ignore the filter and return the whole market
        let row = resp
            .into_data()?
            .into_iter()
            .find(|row| row.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| ExchangeError::UnknownSymbol(symbol.to_string()))?;

        validate_price(symbol, row.last_price)
    }

    fn exchange_name(&self) -> &'static str {
        "lbank"
    }
}
