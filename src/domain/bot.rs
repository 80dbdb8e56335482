//! Bot records: one configured game/site target with its messaging credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::BotId;

/// Messaging credentials for a bot's destination channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Opaque messaging token (a Telegram bot token).
    pub token: String,
    /// Destination identifier (numeric chat id or `@channel`).
    pub destination: String,
}

/// A configured target (game type + site + messaging destination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pub id: BotId,
    pub name: String,
    pub game_type: String,
    pub casino_site: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Bot {
    /// Credentials when both token and destination are present and non-blank.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        let token = self.telegram_token.as_deref().map(str::trim)?;
        let destination = self.telegram_chat_id.as_deref().map(str::trim)?;
        if token.is_empty() || destination.is_empty() {
            return None;
        }
        Some(Credentials {
            token: token.to_string(),
            destination: destination.to_string(),
        })
    }

    /// Whether the bot can receive automatically routed events.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.is_active && self.credentials().is_some()
    }
}

/// Fields for creating a bot.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBot {
    #[serde(default = "default_bot_name")]
    pub name: String,
    #[serde(default = "default_game_type")]
    pub game_type: String,
    #[serde(default)]
    pub casino_site: Option<String>,
    #[serde(default)]
    pub telegram_token: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_bot_name() -> String {
    "Bot".to_string()
}

fn default_game_type() -> String {
    "aviator".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for NewBot {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            game_type: default_game_type(),
            casino_site: None,
            telegram_token: None,
            telegram_chat_id: None,
            is_active: true,
        }
    }
}

/// Partial update for a bot. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotPatch {
    pub name: Option<String>,
    pub game_type: Option<String>,
    pub casino_site: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub is_active: Option<bool>,
}

impl BotPatch {
    /// Apply the patch to an in-memory record.
    pub fn apply(&self, bot: &mut Bot) {
        if let Some(name) = &self.name {
            bot.name.clone_from(name);
        }
        if let Some(game_type) = &self.game_type {
            bot.game_type.clone_from(game_type);
        }
        if let Some(site) = &self.casino_site {
            bot.casino_site = Some(site.clone());
        }
        if let Some(token) = &self.telegram_token {
            bot.telegram_token = Some(token.clone());
        }
        if let Some(chat_id) = &self.telegram_chat_id {
            bot.telegram_chat_id = Some(chat_id.clone());
        }
        if let Some(active) = self.is_active {
            bot.is_active = active;
        }
    }
}
