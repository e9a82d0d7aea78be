//! MEXC Configuration
//!
//! Configuration for the MEXC contract (perpetual futures) public REST API.

// =============================================================================
// Constants
// =============================================================================

/// Production REST base URL
const MAINNET_BASE_URL: &str = "https://contract.mexc.com";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for MEXC public market data
#[derive(Debug, Clone)]
pub struct MexcConfig {
    /// REST base URL (no trailing slash)
    pub base_url: String,
}

impl Default for MexcConfig {
    fn default() -> Self {
        Self {
            base_url: MAINNET_BASE_URL.to_string(),
        }
    }
}

impl MexcConfig {
    /// Create configuration from environment variables
    ///
    /// `MEXC_BASE_URL` overrides the production endpoint.
    pub fn from_env() -> Self {
        let base_url = std::env::var("MEXC_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| MAINNET_BASE_URL.to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Contract list endpoint
    pub fn contracts_url(&self) -> String {
        format!("{}/api/v1/contract/detail", self.base_url)
    }

    /// Single-symbol ticker endpoint (symbol passed as query parameter)
    pub fn ticker_url(&self) -> String {
        format!("{}/api/v1/contract/ticker", self.base_url)
    }
}
