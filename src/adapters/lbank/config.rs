//! LBank Configuration
//!
//! Configuration for the LBank perpetual (USDT-margined swap) public REST API.

/// Production REST base URL
const MAINNET_BASE_URL: &str = "https://lbkperp.lbank.com";

/// Product group for USDT-margined perpetual swaps
pub const PRODUCT_GROUP: &str = "SwapU";

/// Configuration for LBank public market data
#[derive(Debug, Clone)]
pub struct LbankConfig {
    /// REST base URL (no trailing slash)
    pub base_url: String,
}

impl Default for LbankConfig {
    fn default() -> Self {
        Self {
            base_url: MAINNET_BASE_URL.to_string(),
        }
    }
}

impl LbankConfig {
    /// Create configuration from environment variables
    ///
    /// `LBANK_BASE_URL` overrides the production endpoint.
    pub fn from_env() -> Self {
        let base_url = std::env::var("LBANK_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| MAINNET_BASE_URL.to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn instruments_url(&self) -> String {
        format!("{}/cfd/openApi/v1/pub/instrument", self.base_url)
    }

    pub fn market_data_url(&self) -> String {
        format!("{}/cfd/openApi/v1/pub/marketData", self.base_url)
    }
}
