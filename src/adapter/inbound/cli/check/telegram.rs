use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::catalog::Catalog;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;

/// Verify a bot's token and send a test message to its destination.
#[cfg(feature = "telegram")]
pub async fn execute_telegram(config: &Config, catalog: &Catalog, bot_id: i32) -> Result<()> {
    use std::time::Duration;

    use crate::adapter::outbound::notifier::telegram::TelegramMessenger;
    use crate::domain::BotId;

    let bot = catalog.bot(BotId::new(bot_id)).await?;
    let credentials = bot.credentials().ok_or_else(|| {
        Error::Validation(format!("bot {bot_id} has no Telegram token or chat id"))
    })?;
    let messenger = TelegramMessenger::new(Duration::from_secs(config.telegram.timeout_secs));

    output::section("Telegram Check");
    output::action("Checking", "bot token");
    let info = messenger.bot_info(&credentials.token).await?;
    let handle = info
        .username
        .as_deref()
        .map_or_else(|| info.first_name.clone(), |u| format!("@{u}"));
    output::action_done("Verified", &handle);

    output::action("Sending", "test message");
    let delivery = messenger.test_connection(&credentials).await?;
    if !delivery.delivered {
        return Err(Error::Messaging(format!(
            "test message rejected: {}",
            delivery.detail
        )));
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "check.telegram",
            "bot_id": bot_id,
            "masked_token": output::mask_token(&credentials.token),
            "telegram_bot": handle,
            "chat_id": credentials.destination,
            "status": "sent",
        }));
        return Ok(());
    }

    output::field("Bot token", output::mask_token(&credentials.token));
    output::field("Chat ID", &credentials.destination);
    output::action_done("Sent", "test message");
    output::hint("check Telegram for the message");
    Ok(())
}

/// Telegram check (non-telegram variant).
#[cfg(not(feature = "telegram"))]
pub async fn execute_telegram(_config: &Config, _catalog: &Catalog, _bot_id: i32) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({ "command": "check.telegram", "status": "unsupported" }));
    }
    Err(Error::Messaging(
        "this build has no Telegram support".to_string(),
    ))
}
