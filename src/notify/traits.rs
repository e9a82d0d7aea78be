//! Notifier trait definition

use async_trait::async_trait;

use crate::notify::errors::NotifyResult;

/// Outbound message channel for alerts and operator notices.
///
/// Delivery is best effort: callers log failures and move on, and never
/// retry synchronously.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to the operator.
    async fn notify(&self, text: &str) -> NotifyResult<()>;

    /// Whether a destination is configured at all
    fn is_enabled(&self) -> bool {
        true
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    async fn notify(&self, text: &str) -> NotifyResult<()> {
        (**self).notify(text).await
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}
