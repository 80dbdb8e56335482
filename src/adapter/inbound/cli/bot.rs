//! Handlers for `roasbot bot`.

use serde_json::json;
use tabled::Tabled;

use super::command::{BotAddArgs, BotCommand, BotUpdateArgs};
use super::output;
use crate::application::catalog::Catalog;
use crate::domain::{Bot, BotId, BotPatch, NewBot};
use crate::error::Result;

#[derive(Tabled)]
struct BotRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Game")]
    game_type: String,
    #[tabled(rename = "Token")]
    token: String,
    #[tabled(rename = "Chat")]
    chat: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

impl From<&Bot> for BotRow {
    fn from(bot: &Bot) -> Self {
        Self {
            id: bot.id.get(),
            name: bot.name.clone(),
            game_type: bot.game_type.clone(),
            token: bot
                .telegram_token
                .as_deref()
                .map_or_else(|| "-".to_string(), output::mask_token),
            chat: bot.telegram_chat_id.clone().unwrap_or_else(|| "-".to_string()),
            active: if bot.is_active { "yes" } else { "no" },
        }
    }
}

/// Bot as JSON with the token masked.
fn bot_json(bot: &Bot) -> serde_json::Value {
    json!({
        "id": bot.id,
        "name": bot.name,
        "game_type": bot.game_type,
        "casino_site": bot.casino_site,
        "telegram_token": bot.telegram_token.as_deref().map(output::mask_token),
        "telegram_chat_id": bot.telegram_chat_id,
        "is_active": bot.is_active,
        "eligible": bot.is_eligible(),
        "created_at": bot.created_at,
    })
}

fn print_bot(command: &str, verb: &str, bot: &Bot) {
    if output::is_json() {
        output::json_output(json!({ "command": command, "bot": bot_json(bot) }));
        return;
    }
    output::success(&format!("{verb} bot {} ({})", bot.id, bot.name));
    output::field("Game", &bot.game_type);
    output::field("Active", bot.is_active);
    if !bot.is_eligible() {
        output::hint("set --token and --chat so the bot can receive signals");
    }
}

/// Execute a bot subcommand.
pub async fn execute(catalog: &Catalog, command: &BotCommand) -> Result<()> {
    match command {
        BotCommand::Add(args) => add(catalog, args).await,
        BotCommand::List => list(catalog).await,
        BotCommand::Update(args) => update(catalog, args).await,
        BotCommand::Remove(arg) => {
            catalog.remove_bot(BotId::new(arg.id)).await?;
            if output::is_json() {
                output::json_output(json!({ "command": "bot.remove", "id": arg.id }));
            } else {
                output::success(&format!("Removed bot {}", arg.id));
            }
            Ok(())
        }
    }
}

async fn add(catalog: &Catalog, args: &BotAddArgs) -> Result<()> {
    let bot = catalog
        .add_bot(NewBot {
            name: args.name.clone(),
            game_type: args.game_type.clone(),
            casino_site: args.site.clone(),
            telegram_token: args.token.clone(),
            telegram_chat_id: args.chat.clone(),
            is_active: !args.inactive,
        })
        .await?;
    print_bot("bot.add", "Added", &bot);
    Ok(())
}

async fn list(catalog: &Catalog) -> Result<()> {
    let bots = catalog.bots().await?;
    if output::is_json() {
        let bots: Vec<_> = bots.iter().map(bot_json).collect();
        output::json_output(json!({ "command": "bot.list", "bots": bots }));
        return Ok(());
    }

    output::section("Bots");
    output::table(bots.iter().map(BotRow::from).collect(), "no bots configured");
    Ok(())
}

async fn update(catalog: &Catalog, args: &BotUpdateArgs) -> Result<()> {
    let patch = BotPatch {
        name: args.name.clone(),
        game_type: args.game_type.clone(),
        casino_site: args.site.clone(),
        telegram_token: args.token.clone(),
        telegram_chat_id: args.chat.clone(),
        is_active: args.active,
    };
    let bot = catalog.update_bot(BotId::new(args.id), patch).await?;
    print_bot("bot.update", "Updated", &bot);
    Ok(())
}
