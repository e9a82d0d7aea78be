//! Telegram Bot API integration.
//!
//! Provides:
//! - `TelegramNotifier`: `sendMessage` to the operator chat (implements `Notifier`)
//! - `get_updates`: long-poll used by the operator command listener
//! - Optional configuration: without `TELEGRAM_TOKEN`/`CHAT_ID` every send
//!   returns `NotifyError::Disabled` and the process keeps running
//!
//! # Example
//! ```rust,ignore
//! let notifier = TelegramNotifier::new(TelegramConfig::from_env());
//! notifier.notify("Spread alert: BTC +3.12%").await?;
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::notify::errors::{NotifyError, NotifyResult};
use crate::notify::traits::Notifier;

// ============================================================================
// CONSTANTS
// ============================================================================

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Server-side long-poll duration for `getUpdates` (seconds)
pub const LONG_POLL_SECS: u64 = 30;

/// Client-side timeout for one `getUpdates` call; must exceed the long poll
const LONG_POLL_HTTP_TIMEOUT: Duration = Duration::from_secs(35);

/// Timeout for `sendMessage`
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Telegram bot configuration
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token (optional - if None, notifications are disabled)
    pub token: Option<String>,
    /// Operator chat id; the only chat whose commands are obeyed
    pub chat_id: Option<String>,
    /// API base URL (no trailing slash)
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            chat_id: None,
            api_base: TELEGRAM_API_URL.to_string(),
        }
    }
}

impl TelegramConfig {
    /// Create config from `TELEGRAM_TOKEN` and `CHAT_ID`
    pub fn from_env() -> Self {
        let token = std::env::var("TELEGRAM_TOKEN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let chat_id = std::env::var("CHAT_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            token,
            chat_id,
            ..Self::default()
        }
    }

    /// Both token and chat are set
    pub fn is_active(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base.trim_end_matches('/'), token, method)
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope shared by every Bot API method
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

/// One incoming update from `getUpdates`
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

// ============================================================================
// NOTIFIER
// ============================================================================

/// Telegram Bot API client
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: reqwest::Client,
    messages_sent: AtomicU64,
    messages_failed: AtomicU64,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        // Per-request timeouts are set on each call
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();

        Self {
            config,
            client,
            messages_sent: AtomicU64::new(0),
            messages_failed: AtomicU64::new(0),
        }
    }

    pub fn from_env() -> Self {
        Self::new(TelegramConfig::from_env())
    }

    /// A notifier that never sends anything
    pub fn disabled() -> Self {
        Self::new(TelegramConfig::default())
    }

    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// `(sent, failed)` counters
    pub fn stats(&self) -> (u64, u64) {
        (
            self.messages_sent.load(Ordering::Relaxed),
            self.messages_failed.load(Ordering::Relaxed),
        )
    }

    /// Send `text` to an arbitrary chat (used for replies to commands).
    pub async fn send_to(&self, chat_id: &str, text: &str) -> NotifyResult<()> {
        let token = self.config.token.as_deref().ok_or(NotifyError::Disabled)?;
        let url = self.config.method_url(token, "sendMessage");

        let result = async {
            let response = self
                .client
                .post(url)
                .timeout(SEND_TIMEOUT)
                .json(&SendMessagePayload { chat_id, text })
                .send()
                .await?;
            check_response::<serde_json::Value>(response).await.map(|_| ())
        }
        .await;

        match &result {
            Ok(()) => {
                self.messages_sent.fetch_add(1, Ordering::Relaxed);
                debug!(chat_id = chat_id, "Telegram message sent");
            }
            Err(e) => {
                self.messages_failed.fetch_add(1, Ordering::Relaxed);
                warn!(chat_id = chat_id, error = %e, "Telegram message failed");
            }
        }
        result
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> NotifyResult<Vec<Update>> {
        let token = self.config.token.as_deref().ok_or(NotifyError::Disabled)?;
        let url = self.config.method_url(token, "getUpdates");

        let mut query = vec![("timeout", LONG_POLL_SECS.to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(url)
            .query(&query)
            .timeout(LONG_POLL_HTTP_TIMEOUT)
            .send()
            .await?;

        Ok(check_response::<Vec<Update>>(response)
            .await?
            .unwrap_or_default())
    }
}

/// Map non-2xx statuses and `ok == false` to `Rejected`.
async fn check_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> NotifyResult<Option<T>> {
    let status = response.status();
    let body = response.text().await?;

    let parsed: Option<ApiResponse<T>> = serde_json::from_str(&body).ok();
    match parsed {
        Some(api) if status.is_success() && api.ok => Ok(api.result),
        Some(api) => Err(NotifyError::Rejected(format!(
            "HTTP {}: {}",
            status.as_u16(),
            api.description.unwrap_or_else(|| "no description".to_string())
        ))),
        None => Err(NotifyError::Rejected(format!(
            "HTTP {}: unexpected body: {}",
            status.as_u16(),
            body
        ))),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> NotifyResult<()> {
        let chat_id = self.config.chat_id.as_deref().ok_or(NotifyError::Disabled)?;
        self.send_to(chat_id, text).await
    }

    fn is_enabled(&self) -> bool {
        self.config.is_active()
    }
}
