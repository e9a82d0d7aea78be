//! Operator commands received over Telegram.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::snapshot::CycleSnapshot;

/// Rows listed by `/status`
const STATUS_TOP_N: usize = 5;

pub const NOT_AUTHORIZED_REPLY: &str = "Not authorized to use this bot.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Start,
    Help,
    Status,
    Stop,
    Resume,
    Unknown(String),
}

impl OperatorCommand {
    /// Parse a message text. Case-insensitive; a `@botname` suffix and any
    /// arguments are ignored.
    pub fn parse(text: &str) -> Self {
        let first = text.split_whitespace().next().unwrap_or("");
        let command = first.split('@').next().unwrap_or("").to_ascii_lowercase();

        match command.as_str() {
            "/start" => Self::Start,
            "/help" => Self::Help,
            "/status" => Self::Status,
            "/stop" => Self::Stop,
            "/resume" => Self::Resume,
            _ => Self::Unknown(text.trim().to_string()),
        }
    }
}

/// Apply a command and build the reply.
///
/// `/stop` and `/resume` flip the shared alert switch; monitoring itself
/// keeps running either way.
pub fn handle_command(
    command: &OperatorCommand,
    snapshot: &CycleSnapshot,
    alerts_enabled: &AtomicBool,
) -> String {
    match command {
        OperatorCommand::Start => {
            "Spread monitor is running.\nUse /help for the command list.".to_string()
        }
        OperatorCommand::Help => [
            "Available commands:",
            "/start - Greeting",
            "/status - Top spreads and alert state",
            "/stop - Pause alerts (monitoring continues)",
            "/resume - Re-enable alerts",
            "/help - Show this message",
        ]
        .join("\n"),
        OperatorCommand::Status => {
            format_status(snapshot, alerts_enabled.load(Ordering::SeqCst))
        }
        OperatorCommand::Stop => {
            alerts_enabled.store(false, Ordering::SeqCst);
            "Alerts paused. Monitoring continues without notifications.".to_string()
        }
        OperatorCommand::Resume => {
            alerts_enabled.store(true, Ordering::SeqCst);
            "Alerts resumed.".to_string()
        }
        OperatorCommand::Unknown(_) => "Unknown command. Use /help.".to_string(),
    }
}

/// Text for `/status`: refresh times, top spreads, alert state.
pub fn format_status(snapshot: &CycleSnapshot, alerts_enabled: bool) -> String {
    let mut lines = vec![
        format!(
            "{} vs {} | cycle {} | {} pairs",
            snapshot.exchange_a.to_uppercase(),
            snapshot.exchange_b.to_uppercase(),
            snapshot.cycle,
            snapshot.pair_count
        ),
        format!("Pairs refreshed: {}", snapshot.pairs_refreshed_label()),
        format!("Prices refreshed: {}", snapshot.prices_refreshed_label()),
    ];

    if snapshot.results.is_empty() {
        lines.push("No spreads yet.".to_string());
    } else {
        for result in snapshot.top(STATUS_TOP_N) {
            lines.push(format!(
                "{}: {} / {} ({:+.2}%)",
                result.base_asset, result.price_a, result.price_b, result.spread_percent
            ));
        }
    }

    lines.push(format!(
        "Alerts: {} (threshold {:.2}%, {} in cooldown)",
        if alerts_enabled { "active" } else { "paused" },
        snapshot.threshold_percent,
        snapshot.armed_cooldowns
    ));
    lines.join("\n")
}
