//! Telegram delivery configuration.

use serde::Deserialize;

/// Telegram delivery configuration.
///
/// Bot tokens and destinations live on each bot record, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Send through the Bot API. When false, signals are only logged.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_enabled() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
