//! LBank Types
//!
//! REST response envelopes for the LBank perpetual API.
//!
//! Responses look like `{ "data": ..., "error_code": 0, "msg": "Success", "success": true }`.
//! Prices in `marketData` are sent as decimal strings.

use serde::Deserialize;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::de_lenient_f64;

/// Generic response envelope
#[derive(Debug, Deserialize)]
pub struct LbankResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}

impl<T> LbankResponse<T> {
    pub fn into_data(self) -> ExchangeResult<T> {
        if !self.success || self.error_code != 0 {
            return Err(ExchangeError::InvalidResponse(format!(
                "LBank error code {}: {}",
                self.error_code,
                self.msg.unwrap_or_default()
            )));
        }
        self.data
            .ok_or_else(|| ExchangeError::InvalidResponse("LBank response without data".into()))
    }
}

/// One entry of `/cfd/openApi/v1/pub/instrument`
#[derive(Debug, Clone, Deserialize)]
pub struct LbankInstrument {
    pub symbol: String,
}

/// One entry of `/cfd/openApi/v1/pub/marketData`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LbankMarketData {
    pub symbol: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub last_price: f64,
}
