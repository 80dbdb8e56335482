//! Database model types for Diesel ORM and their domain conversions.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{bots, game_results, strategies};
use crate::domain::{
    Bot, BotId, GameResult, NewBot, NewGameResult, NewStrategy, Resolution, Stage, Strategy,
    StrategyCounters, StrategyId,
};
use crate::error::{Error, Result};

/// Database row for a bot (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = bots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BotRow {
    pub id: Option<i32>,
    pub name: String,
    pub game_type: String,
    pub casino_site: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

/// Database row for a bot (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = bots)]
pub struct NewBotRow {
    pub name: String,
    pub game_type: String,
    pub casino_site: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

/// Full bot changeset written after a patch is applied.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = bots)]
#[diesel(treat_none_as_null = true)]
pub struct BotChanges {
    pub name: String,
    pub game_type: String,
    pub casino_site: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub is_active: bool,
}

/// Database row for a strategy (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = strategies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StrategyRow {
    pub id: Option<i32>,
    pub bot_id: i32,
    pub name: String,
    pub pattern: String,
    pub need: i32,
    pub action: String,
    pub use_default_message: bool,
    pub custom_message: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: bool,
    pub total_signals: i32,
    pub wins: i32,
    pub losses: i32,
    pub wins_with_gale: i32,
    pub wins_no_gale: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for a strategy (insertable). Counters start at their defaults.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = strategies)]
pub struct NewStrategyRow {
    pub bot_id: i32,
    pub name: String,
    pub pattern: String,
    pub need: i32,
    pub action: String,
    pub use_default_message: bool,
    pub custom_message: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Configuration fields of a strategy written after a patch is applied.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = strategies)]
#[diesel(treat_none_as_null = true)]
pub struct StrategyChanges {
    pub name: String,
    pub pattern: String,
    pub need: i32,
    pub action: String,
    pub use_default_message: bool,
    pub custom_message: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: bool,
    pub updated_at: String,
}

/// Database row for a game result (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = game_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameResultRow {
    pub id: Option<i32>,
    pub strategy_id: i32,
    pub stage: String,
    pub game_data: String,
    pub signal_sent: bool,
    pub result: Option<String>,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

/// Database row for a game result (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = game_results)]
pub struct NewGameResultRow {
    pub strategy_id: i32,
    pub stage: String,
    pub game_data: String,
    pub signal_sent: bool,
    pub created_at: String,
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("timestamp '{raw}': {e}")))
}

fn require_id(id: Option<i32>, table: &str) -> Result<i32> {
    id.ok_or_else(|| Error::Database(format!("{table} row without id")))
}

fn need_to_db(need: u32) -> Result<i32> {
    i32::try_from(need).map_err(|_| Error::Validation(format!("need {need} is too large")))
}

impl NewBotRow {
    pub fn from_domain(bot: NewBot, now: DateTime<Utc>) -> Self {
        Self {
            name: bot.name,
            game_type: bot.game_type,
            casino_site: bot.casino_site,
            telegram_token: bot.telegram_token,
            telegram_chat_id: bot.telegram_chat_id,
            is_active: bot.is_active,
            created_at: timestamp(now),
        }
    }
}

impl BotRow {
    pub fn into_domain(self) -> Result<Bot> {
        Ok(Bot {
            id: BotId::new(require_id(self.id, "bots")?),
            name: self.name,
            game_type: self.game_type,
            casino_site: self.casino_site,
            telegram_token: self.telegram_token,
            telegram_chat_id: self.telegram_chat_id,
            is_active: self.is_active,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl From<&Bot> for BotChanges {
    fn from(bot: &Bot) -> Self {
        Self {
            name: bot.name.clone(),
            game_type: bot.game_type.clone(),
            casino_site: bot.casino_site.clone(),
            telegram_token: bot.telegram_token.clone(),
            telegram_chat_id: bot.telegram_chat_id.clone(),
            is_active: bot.is_active,
        }
    }
}

impl NewStrategyRow {
    pub fn from_domain(strategy: NewStrategy, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            bot_id: strategy.bot_id.get(),
            name: strategy.name,
            pattern: strategy.pattern,
            need: need_to_db(strategy.need)?,
            action: strategy.action,
            use_default_message: strategy.use_default_message,
            custom_message: strategy.custom_message,
            start_time: strategy.start_time,
            end_time: strategy.end_time,
            is_active: strategy.is_active,
            created_at: timestamp(now),
            updated_at: timestamp(now),
        })
    }
}

impl StrategyRow {
    pub fn into_domain(self) -> Result<Strategy> {
        Ok(Strategy {
            id: StrategyId::new(require_id(self.id, "strategies")?),
            bot_id: BotId::new(self.bot_id),
            name: self.name,
            pattern: self.pattern,
            need: u32::try_from(self.need).unwrap_or(0),
            action: self.action,
            use_default_message: self.use_default_message,
            custom_message: self.custom_message,
            start_time: self.start_time,
            end_time: self.end_time,
            is_active: self.is_active,
            counters: StrategyCounters {
                total_signals: self.total_signals,
                wins: self.wins,
                losses: self.losses,
                wins_with_gale: self.wins_with_gale,
                wins_no_gale: self.wins_no_gale,
            },
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl StrategyChanges {
    pub fn from_domain(strategy: &Strategy, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            name: strategy.name.clone(),
            pattern: strategy.pattern.clone(),
            need: need_to_db(strategy.need)?,
            action: strategy.action.clone(),
            use_default_message: strategy.use_default_message,
            custom_message: strategy.custom_message.clone(),
            start_time: strategy.start_time.clone(),
            end_time: strategy.end_time.clone(),
            is_active: strategy.is_active,
            updated_at: timestamp(now),
        })
    }
}

impl NewGameResultRow {
    pub fn from_domain(result: NewGameResult, now: DateTime<Utc>) -> Self {
        Self {
            strategy_id: result.strategy_id.get(),
            stage: result.stage.as_str().to_string(),
            game_data: result.game_data,
            signal_sent: result.signal_sent,
            created_at: timestamp(now),
        }
    }
}

impl GameResultRow {
    pub fn into_domain(self) -> Result<GameResult> {
        let stage = match self.stage.as_str() {
            "pre" => Stage::Pre,
            "confirmed" => Stage::Confirmed,
            other => return Err(Error::Parse(format!("unknown stage '{other}'"))),
        };
        let resolution = self
            .result
            .as_deref()
            .map(|raw| {
                Resolution::parse(raw)
                    .ok_or_else(|| Error::Parse(format!("unknown resolution '{raw}'")))
            })
            .transpose()?;

        Ok(GameResult {
            id: require_id(self.id, "game_results")?,
            strategy_id: StrategyId::new(self.strategy_id),
            stage,
            game_data: self.game_data,
            signal_sent: self.signal_sent,
            resolution,
            created_at: parse_timestamp(&self.created_at)?,
            resolved_at: self.resolved_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_row_round_trips_stage_and_resolution() {
        let row = GameResultRow {
            id: Some(3),
            strategy_id: 1,
            stage: "confirmed".into(),
            game_data: "{}".into(),
            signal_sent: true,
            result: Some("win_gale".into()),
            created_at: timestamp(Utc::now()),
            resolved_at: Some(timestamp(Utc::now())),
        };
        let result = row.into_domain().unwrap();
        assert_eq!(result.stage, Stage::Confirmed);
        assert_eq!(result.resolution, Some(Resolution::Win { gale: true }));
    }

    #[test]
    fn row_without_id_is_rejected() {
        let row = BotRow {
            id: None,
            name: "b".into(),
            game_type: "aviator".into(),
            casino_site: None,
            telegram_token: None,
            telegram_chat_id: None,
            is_active: true,
            created_at: timestamp(Utc::now()),
        };
        assert_eq!(row.into_domain().unwrap_err().kind(), "database");
    }

    #[test]
    fn bad_timestamp_is_a_parse_error() {
        let row = BotRow {
            id: Some(1),
            name: "b".into(),
            game_type: "aviator".into(),
            casino_site: None,
            telegram_token: None,
            telegram_chat_id: None,
            is_active: true,
            created_at: "yesterday".into(),
        };
        assert_eq!(row.into_domain().unwrap_err().kind(), "parse");
    }
}
