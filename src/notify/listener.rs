//! Telegram operator-command listener.
//!
//! Long-polls `getUpdates`, answers commands from the operator chat and
//! tells every other chat it is not authorized. Errors are logged and the
//! poll resumes after `LISTENER_RETRY_DELAY`.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::core::snapshot::{CycleSnapshot, SnapshotReceiver};
use crate::notify::commands::{handle_command, OperatorCommand, NOT_AUTHORIZED_REPLY};
use crate::notify::errors::NotifyResult;
use crate::notify::telegram::{TelegramNotifier, Update};

pub const LISTENER_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Decide the reply for one update. `None` when the update carries no text.
///
/// Returns `(chat_id, reply)`.
pub fn reply_for(
    update: &Update,
    operator_chat: &str,
    snapshot: &CycleSnapshot,
    alerts_enabled: &AtomicBool,
) -> Option<(String, String)> {
    let message = update.message.as_ref()?;
    let text = message.text.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    let chat_id = message.chat.id.to_string();

    if chat_id != operator_chat {
        warn!(chat_id = %chat_id, "Command from unauthorized chat");
        return Some((chat_id, NOT_AUTHORIZED_REPLY.to_string()));
    }

    let command = OperatorCommand::parse(text);
    info!(command = ?command, "Operator command received");
    let reply = handle_command(&command, snapshot, alerts_enabled);
    Some((chat_id, reply))
}

/// Fetch one batch of updates and answer them. Returns the next offset.
pub async fn poll_once(
    notifier: &TelegramNotifier,
    offset: Option<i64>,
    snapshots: &SnapshotReceiver,
    alerts_enabled: &AtomicBool,
) -> NotifyResult<Option<i64>> {
    let operator_chat = notifier.config().chat_id.clone().unwrap_or_default();
    let updates = notifier.get_updates(offset).await?;
    let mut next = offset;

    for update in &updates {
        next = Some(update.update_id + 1);
        let snapshot = Arc::clone(&snapshots.borrow());
        if let Some((chat_id, reply)) = reply_for(update, &operator_chat, &snapshot, alerts_enabled) {
            // A failed reply must not block the offset from advancing
            if let Err(e) = notifier.send_to(&chat_id, &reply).await {
                debug!(chat_id = %chat_id, error = %e, "Reply not delivered");
            }
        }
    }
    Ok(next)
}

/// Run until `shutdown` fires. Returns immediately when Telegram is not
/// configured.
pub async fn run_listener(
    notifier: Arc<TelegramNotifier>,
    snapshots: SnapshotReceiver,
    alerts_enabled: Arc<AtomicBool>,
    shutdown: CancellationToken,
) {
    if !notifier.config().is_active() {
        info!("Telegram listener disabled (TELEGRAM_TOKEN/CHAT_ID not set)");
        return;
    }

    info!("Telegram listener started");
    let mut offset: Option<i64> = None;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            result = poll_once(&notifier, offset, &snapshots, &alerts_enabled) => {
                match result {
                    Ok(next) => offset = next,
                    Err(e) => {
                        error!(error = %e, "Telegram listener error");
                        tokio::select! {
                            _ = shutdown.cancelled() => break,
                            _ = tokio::time::sleep(LISTENER_RETRY_DELAY) => {}
                        }
                    }
                }
            }
        }
    }

    info!("Telegram listener stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::SnapshotStore;
    use crate::notify::telegram::{Chat, Message, TelegramConfig};
    use mockito::Matcher;
    use std::sync::atomic::Ordering;

    fn update(id: i64, chat: i64, text: Option<&str>) -> Update {
        Update {
            update_id: id,
            message: Some(Message {
                chat: Chat { id: chat },
                text: text.map(str::to_string),
            }),
        }
    }

    #[test]
    fn test_unauthorized_chat_gets_refusal() {
        let snapshot = CycleSnapshot::empty("mexc", "lbank", 3.0);
        let switch = AtomicBool::new(true);

        let (chat, reply) = reply_for(&update(1, 7, Some("/stop")), "42", &snapshot, &switch).unwrap();
        assert_eq!(chat, "7");
        assert_eq!(reply, NOT_AUTHORIZED_REPLY);
        assert!(switch.load(Ordering::SeqCst), "foreign /stop must be ignored");
    }

    #[test]
    fn test_operator_stop_pauses_alerts() {
        let snapshot = CycleSnapshot::empty("mexc", "lbank", 3.0);
        let switch = AtomicBool::new(true);

        let (chat, _) = reply_for(&update(1, 42, Some("/stop")), "42", &snapshot, &switch).unwrap();
        assert_eq!(chat, "42");
        assert!(!switch.load(Ordering::SeqCst));
    }

    #[test]
    fn test_updates_without_text_are_skipped() {
        let snapshot = CycleSnapshot::empty("mexc", "lbank", 3.0);
        let switch = AtomicBool::new(true);

        assert!(reply_for(&update(1, 42, None), "42", &snapshot, &switch).is_none());
        assert!(reply_for(&update(1, 42, Some("   ")), "42", &snapshot, &switch).is_none());
        let bare = Update { update_id: 2, message: None };
        assert!(reply_for(&bare, "42", &snapshot, &switch).is_none());
    }

    #[tokio::test]
    async fn test_poll_once_answers_and_advances_offset() {
        let mut server = mockito::Server::new_async().await;
        let updates = server
            .mock("GET", "/botT/getUpdates")
            .match_query(Matcher::UrlEncoded("timeout".into(), "30".into()))
            .with_status(200)
            .with_body(
                r#"{"ok":true,"result":[
                    {"update_id":100,"message":{"chat":{"id":42},"text":"/help"}},
                    {"update_id":101,"message":{"chat":{"id":9},"text":"/status"}}
                ]}"#,
            )
            .create_async()
            .await;
        let replies = server
            .mock("POST", "/botT/sendMessage")
            .with_status(200)
            .with_body(r#"{"ok":true,"result":{}}"#)
            .expect(2)
            .create_async()
            .await;

        let notifier = TelegramNotifier::new(TelegramConfig {
            token: Some("T".into()),
            chat_id: Some("42".into()),
            api_base: server.url(),
        });
        let store = SnapshotStore::new(CycleSnapshot::empty("mexc", "lbank", 3.0));
        let switch = AtomicBool::new(true);

        let next = poll_once(&notifier, None, &store.subscribe(), &switch).await.unwrap();

        updates.assert_async().await;
        replies.assert_async().await;
        assert_eq!(next, Some(102));
    }

    #[tokio::test]
    async fn test_listener_returns_when_disabled() {
        let store = SnapshotStore::new(CycleSnapshot::empty("mexc", "lbank", 3.0));
        let finished = tokio::time::timeout(
            Duration::from_secs(1),
            run_listener(
                Arc::new(TelegramNotifier::disabled()),
                store.subscribe(),
                Arc::new(AtomicBool::new(true)),
                CancellationToken::new(),
            ),
        )
        .await;
        assert!(finished.is_ok());
    }
}
