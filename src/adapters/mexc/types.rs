//! MEXC Types
//!
//! REST response envelopes for the MEXC contract API.
//!
//! Every response is wrapped as `{ "success": bool, "code": int, "data": ... }`.

use serde::Deserialize;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::de_lenient_f64;

/// Contract state value meaning "enabled for trading"
pub const CONTRACT_STATE_ENABLED: i32 = 0;

/// Generic response envelope
#[derive(Debug, Deserialize)]
pub struct MexcResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> MexcResponse<T> {
    /// Unwrap `data`, turning `success == false` or a missing payload into
    /// `ExchangeError::InvalidResponse`.
    pub fn into_data(self) -> ExchangeResult<T> {
        if !self.success {
            return Err(ExchangeError::InvalidResponse(format!(
                "MEXC error code {}: {}",
                self.code,
                self.message.unwrap_or_default()
            )));
        }
        self.data
            .ok_or_else(|| ExchangeError::InvalidResponse("MEXC response without data".into()))
    }
}

/// One entry of `/api/v1/contract/detail`
#[derive(Debug, Clone, Deserialize)]
pub struct MexcContract {
    pub symbol: String,
    /// 0 = enabled; other values are delisted / paused contracts
    #[serde(default)]
    pub state: Option<i32>,
}

impl MexcContract {
    pub fn is_tradable(&self) -> bool {
        self.state.map_or(true, |s| s == CONTRACT_STATE_ENABLED)
    }
}

/// Payload of `/api/v1/contract/ticker?symbol=...`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MexcTicker {
    pub symbol: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub last_price: f64,
}
