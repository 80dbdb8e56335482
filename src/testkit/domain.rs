//! Builders for domain records used across tests.

use chrono::{TimeZone, Utc};

use crate::domain::{
    Bot, BotId, NewBot, NewStrategy, Strategy, StrategyCounters, StrategyId,
};

/// A valid creation request for an aviator bot with credentials.
pub fn new_bot(name: &str) -> NewBot {
    NewBot {
        name: name.to_string(),
        game_type: "aviator".to_string(),
        casino_site: Some("example-casino".to_string()),
        telegram_token: Some("123456:test-token".to_string()),
        telegram_chat_id: Some("-1001234567890".to_string()),
        is_active: true,
    }
}

/// A `low-mults` strategy request with `need = 3` and no window.
pub fn new_strategy(bot_id: BotId) -> NewStrategy {
    NewStrategy {
        bot_id,
        name: "Low run".to_string(),
        pattern: "low-mults".to_string(),
        need: 3,
        action: "cash out at 2.5x".to_string(),
        use_default_message: true,
        custom_message: None,
        start_time: None,
        end_time: None,
        is_active: true,
    }
}

/// Builder for stored [`Bot`] records.
pub struct BotBuilder {
    bot: Bot,
}

impl BotBuilder {
    pub fn new(id: i32) -> Self {
        Self {
            bot: Bot {
                id: BotId::new(id),
                name: format!("Bot {id}"),
                game_type: "aviator".to_string(),
                casino_site: None,
                telegram_token: Some("123456:test-token".to_string()),
                telegram_chat_id: Some("-1001234567890".to_string()),
                is_active: true,
                created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            },
        }
    }

    pub fn game_type(mut self, game_type: &str) -> Self {
        self.bot.game_type = game_type.to_string();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.bot.is_active = false;
        self
    }

    pub fn without_credentials(mut self) -> Self {
        self.bot.telegram_token = None;
        self
    }

    pub fn build(self) -> Bot {
        self.bot
    }
}

/// Builder for stored [`Strategy`] records.
pub struct StrategyBuilder {
    strategy: Strategy,
}

impl StrategyBuilder {
    pub fn new(id: i32, bot_id: i32) -> Self {
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Self {
            strategy: Strategy {
                id: StrategyId::new(id),
                bot_id: BotId::new(bot_id),
                name: "Low run".to_string(),
                pattern: "low-mults".to_string(),
                need: 3,
                action: "cash out at 2.5x".to_string(),
                use_default_message: true,
                custom_message: None,
                start_time: None,
                end_time: None,
                is_active: true,
                counters: StrategyCounters::default(),
                created_at,
                updated_at: created_at,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.strategy.name = name.to_string();
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.strategy.pattern = pattern.to_string();
        self
    }

    pub fn need(mut self, need: u32) -> Self {
        self.strategy.need = need;
        self
    }

    pub fn window(mut self, start: &str, end: &str) -> Self {
        self.strategy.start_time = Some(start.to_string());
        self.strategy.end_time = Some(end.to_string());
        self
    }

    /// Use `template` instead of the default message.
    pub fn custom_message(mut self, template: &str) -> Self {
        self.strategy.custom_message = Some(template.to_string());
        self.strategy.use_default_message = false;
        self
    }

    pub fn counters(mut self, counters: StrategyCounters) -> Self {
        self.strategy.counters = counters;
        self
    }

    pub fn build(self) -> Strategy {
        self.strategy
    }
}
