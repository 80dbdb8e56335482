//! Telegram Bot API messenger.
//!
//! Each bot record carries its own token, so clients are created lazily and
//! cached per token. Messages are sent with HTML parse mode.
//!
//! Requires the `telegram` feature to be enabled.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use teloxide::prelude::*;
use teloxide::types::{ParseMode, Recipient};
use teloxide::{Bot as TelegramBot, RequestError};
use tracing::{debug, warn};

use crate::domain::Credentials;
use crate::error::{Error, Result};
use crate::port::outbound::messenger::{Delivery, Messenger};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Text sent by the connectivity check.
pub const TEST_MESSAGE: &str = "🤖 Connection test: the bot is working!";

/// Identity reported by the Bot API for a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotInfo {
    pub id: u64,
    pub username: Option<String>,
    pub first_name: String,
}

/// Messenger backed by the Telegram Bot API.
pub struct TelegramMessenger {
    clients: DashMap<String, TelegramBot>,
    timeout: Duration,
}

impl TelegramMessenger {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            clients: DashMap::new(),
            timeout,
        }
    }

    fn client(&self, token: &str) -> TelegramBot {
        self.clients
            .entry(token.to_string())
            .or_insert_with(|| TelegramBot::new(token))
            .value()
            .clone()
    }

    /// Look up the bot behind `token` (`getMe`).
    pub async fn bot_info(&self, token: &str) -> Result<BotInfo> {
        let client = self.client(token);
        let me = tokio::time::timeout(self.timeout, client.get_me().send())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| Error::Messaging(e.to_string()))?;

        Ok(BotInfo {
            id: me.user.id.0,
            username: me.user.username.clone(),
            first_name: me.user.first_name.clone(),
        })
    }

    /// Send the fixed test message to the destination.
    pub async fn test_connection(&self, credentials: &Credentials) -> Result<Delivery> {
        self.send(credentials, TEST_MESSAGE).await
    }

    fn timed_out(&self) -> Error {
        Error::Messaging(format!(
            "telegram request timed out after {}s",
            self.timeout.as_secs()
        ))
    }
}

impl Default for TelegramMessenger {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

/// Numeric destinations are chat ids; anything else is a channel username.
#[must_use]
pub fn recipient(destination: &str) -> Recipient {
    let destination = destination.trim();
    match destination.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if destination.starts_with('@') => {
            Recipient::ChannelUsername(destination.to_string())
        }
        Err(_) => Recipient::ChannelUsername(format!("@{destination}")),
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, credentials: &Credentials, text: &str) -> Result<Delivery> {
        let client = self.client(&credentials.token);
        let request = client
            .send_message(recipient(&credentials.destination), text)
            .parse_mode(ParseMode::Html)
            .send();

        match tokio::time::timeout(self.timeout, request).await {
            Err(_) => Err(self.timed_out()),
            Ok(Ok(message)) => {
                debug!(
                    destination = %credentials.destination,
                    message_id = message.id.0,
                    "Telegram message sent"
                );
                Ok(Delivery::delivered(format!("message {}", message.id.0)))
            }
            Ok(Err(RequestError::Api(api))) => {
                warn!(
                    destination = %credentials.destination,
                    error = %api,
                    "Telegram rejected message"
                );
                Ok(Delivery::rejected(api.to_string()))
            }
            Ok(Err(e)) => Err(Error::Messaging(e.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
