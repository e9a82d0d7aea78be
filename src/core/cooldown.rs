//! Per-pair alert cooldown.
//!
//! Each pair key is either quiet (never alerted, or the window elapsed) or
//! recently alerted. Only a delivered notification arms the window.

use std::collections::HashMap;

/// Default cooldown window (10 minutes)
pub const DEFAULT_ALERT_COOLDOWN_SECS: u64 = 600;

/// Tracks the last delivered alert per pair key (`symbolA|symbolB`).
#[derive(Debug, Clone)]
pub struct AlertCooldownTracker {
    cooldown_ms: u64,
    last_alert_ms: HashMap<String, u64>,
}

impl AlertCooldownTracker {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            last_alert_ms: HashMap::new(),
        }
    }

    pub fn from_secs(cooldown_secs: u64) -> Self {
        Self::new(cooldown_secs.saturating_mul(1000))
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// True when the pair is quiet at `now_ms`. Does not change state.
    pub fn should_alert(&self, key: &str, now_ms: u64) -> bool {
        match self.last_alert_ms.get(key) {
            None => true,
            Some(&last) => now_ms.saturating_sub(last) >= self.cooldown_ms,
        }
    }

    /// Arm the window for `key`. Call only after delivery succeeded.
    pub fn record_alert(&mut self, key: &str, now_ms: u64) {
        self.last_alert_ms.insert(key.to_string(), now_ms);
    }

    /// Drop entries whose window has elapsed.
    pub fn prune(&mut self, now_ms: u64) {
        let cooldown_ms = self.cooldown_ms;
        self.last_alert_ms
            .retain(|_, last| now_ms.saturating_sub(*last) < cooldown_ms);
    }

    /// Number of pairs still inside their window at `now_ms`
    pub fn armed_count(&self, now_ms: u64) -> usize {
        self.last_alert_ms
            .values()
            .filter(|&&last| now_ms.saturating_sub(last) < self.cooldown_ms)
            .count()
    }
}

impl Default for AlertCooldownTracker {
    fn default() -> Self {
        Self::from_secs(DEFAULT_ALERT_COOLDOWN_SECS)
    }
}
