//! MEXC Price Source Implementation
//!
//! Public REST endpoints of the MEXC contract API:
//! - `GET /api/v1/contract/detail` for the perpetual symbol list
//! - `GET /api/v1/contract/ticker?symbol=...` for the last traded price

use async_trait::async_trait;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::PriceSource;
use crate::adapters::types::{create_http_client, get_json, validate_price};

use super::config::MexcConfig;
use super::types::{MexcContract, MexcResponse, MexcTicker};

/// MEXC contract market data source
pub struct MexcSource {
    config: MexcConfig,
    http: reqwest::Client,
}

impl MexcSource {
    pub fn new(config: MexcConfig) -> Self {
        Self {
            config,
            http: create_http_client("mexc"),
        }
    }
}

#[async_trait]
impl PriceSource for MexcSource {
    async fn get_symbols(&self) -> ExchangeResult<Vec<String>> {
        let resp: MexcResponse<Vec<MexcContract>> =
            get_json(self.http.get(self.config.contracts_url())).await?;

        let symbols: Vec<String> = resp
            .into_data()?
            .into_iter()
            .filter(MexcContract::is_tradable)
            .map(|c| c.symbol)
            .collect();

        tracing::debug!(exchange = "mexc", count = symbols.len(), "Contract list fetched");
        Ok(symbols)
    }

    async fn get_price(&self, symbol: &str) -> ExchangeResult<f64> {
        let request = self
            .http
            .get(self.config.ticker_url())
            .query(&[("symbol", symbol)]);
        let resp: MexcResponse<MexcTicker> = get_json(request).await?;
        let ticker = resp.into_data()?;

        if !ticker.symbol.eq_ignore_ascii_case(symbol) {
            return Err(ExchangeError::InvalidResponse(format!(
                "MEXC ticker for {} answered with {}",
                symbol, ticker.symbol
            )));
        }

        validate_price(symbol, ticker.last_price)
    }

    fn exchange_name(&self) -> &'static str {
        "mexc"
    }
}
