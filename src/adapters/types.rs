//! Shared types and helpers for exchange price sources

use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

// =============================================================================
// HTTP Client Constants
// =============================================================================

/// HTTP request timeout (seconds); the fetcher applies its own tighter
/// per-call timeout on top of this
const HTTP_TIMEOUT_SECS: u64 = 15;
/// HTTP connection timeout (milliseconds), fail fast if host unreachable
const HTTP_CONNECT_TIMEOUT_MS: u64 = 3000;
/// Max idle connections per host in connection pool
const HTTP_POOL_MAX_IDLE: usize = 16;
/// How long idle connections stay in the pool (seconds)
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 60;
/// TCP keepalive interval (seconds)
const HTTP_TCP_KEEPALIVE_SECS: u64 = 30;

/// Create a pooled HTTP client for one exchange
///
/// Pool size matches the default fetch concurrency so a full batch reuses
/// warm connections.
pub fn create_http_client(exchange_name: &str) -> reqwest::Client {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE)
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .tcp_keepalive(Duration::from_secs(HTTP_TCP_KEEPALIVE_SECS))
        .connect_timeout(Duration::from_millis(HTTP_CONNECT_TIMEOUT_MS))
        .tcp_nodelay(true)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
    tracing::info!(
        phase = "init",
        exchange = %exchange_name,
        timeout_s = HTTP_TIMEOUT_SECS,
        connect_timeout_ms = HTTP_CONNECT_TIMEOUT_MS,
        pool_max_idle = HTTP_POOL_MAX_IDLE,
        "HTTP client configured"
    );
    client
}

/// Reject zero, negative, NaN and infinite prices.
pub fn validate_price(symbol: &str, price: f64) -> ExchangeResult<f64> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(ExchangeError::InvalidPrice {
            symbol: symbol.to_string(),
            price,
        })
    }
}

/// Send a GET request and decode the JSON body, mapping non-2xx statuses
/// to `ExchangeError::HttpStatus`.
pub async fn get_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> ExchangeResult<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ExchangeError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        ExchangeError::InvalidResponse(format!("JSON decode failed: {} - body: {}", e, body))
    })
}

/// Deserialize a price that some venues send as a JSON number and others
/// as a decimal string.
pub fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }

    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}
