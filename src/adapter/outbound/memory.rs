//! In-process configuration store.
//!
//! Used by tests and by `database = ":memory:"`. All tables sit behind one
//! lock so multi-record operations (cascade delete, resolve, signal recording)
//! are atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::{
    Bot, BotId, BotPatch, GameResult, NewBot, NewGameResult, NewStrategy, Resolution, Strategy,
    StrategyCounters, StrategyId, StrategyPatch,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{BotStore, GameResultStore, StrategyStore};

#[derive(Debug, Default)]
struct Tables {
    bots: BTreeMap<i32, Bot>,
    strategies: BTreeMap<i32, Strategy>,
    results: BTreeMap<i32, GameResult>,
    next_bot: i32,
    next_strategy: i32,
    next_result: i32,
}

impl Tables {
    fn insert_result(&mut self, result: NewGameResult) -> Result<GameResult> {
        if !self.strategies.contains_key(&result.strategy_id.get()) {
            return Err(Error::NotFound {
                entity: "strategy",
                id: result.strategy_id.get(),
            });
        }
        let id = next_id(&mut self.next_result);
        let result = GameResult {
            id,
            strategy_id: result.strategy_id,
            stage: result.stage,
            game_data: result.game_data,
            signal_sent: result.signal_sent,
            resolution: None,
            created_at: Utc::now(),
            resolved_at: None,
        };
        self.results.insert(id, result.clone());
        Ok(result)
    }
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_game(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[async_trait]
impl BotStore for MemoryStore {
    async fn create_bot(&self, bot: NewBot) -> Result<Bot> {
        let mut tables = self.tables.write();
        let id = next_id(&mut tables.next_bot);
        let bot = Bot {
            id: BotId::new(id),
            name: bot.name,
            game_type: bot.game_type,
            casino_site: bot.casino_site,
            telegram_token: bot.telegram_token,
            telegram_chat_id: bot.telegram_chat_id,
            is_active: bot.is_active,
            created_at: Utc::now(),
        };
        tables.bots.insert(id, bot.clone());
        Ok(bot)
    }

    async fn get_bot(&self, id: BotId) -> Result<Option<Bot>> {
        Ok(self.tables.read().bots.get(&id.get()).cloned())
    }

    async fn list_bots(&self) -> Result<Vec<Bot>> {
        Ok(self.tables.read().bots.values().rev().cloned().collect())
    }

    async fn update_bot(&self, id: BotId, patch: BotPatch) -> Result<Option<Bot>> {
        let mut tables = self.tables.write();
        Ok(tables.bots.get_mut(&id.get()).map(|bot| {
            patch.apply(bot);
            bot.clone()
        }))
    }

    async fn delete_bot(&self, id: BotId) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.bots.remove(&id.get()).is_none() {
            return Ok(false);
        }
        let owned: Vec<i32> = tables
            .strategies
            .values()
            .filter(|s| s.bot_id == id)
            .map(|s| s.id.get())
            .collect();
        for strategy_id in &owned {
            tables.strategies.remove(strategy_id);
        }
        tables
            .results
            .retain(|_, r| !owned.contains(&r.strategy_id.get()));
        Ok(true)
    }

    async fn latest_eligible_bot(&self, game_type: Option<&str>) -> Result<Option<Bot>> {
        let tables = self.tables.read();
        Ok(tables
            .bots
            .values()
            .filter(|bot| bot.is_eligible())
            .filter(|bot| game_type.map_or(true, |g| same_game(&bot.game_type, g)))
            .max_by_key(|bot| (bot.created_at, bot.id))
            .cloned())
    }
}

#[async_trait]
impl StrategyStore for MemoryStore {
    async fn create_strategy(&self, strategy: NewStrategy) -> Result<Strategy> {
        let mut tables = self.tables.write();
        if !tables.bots.contains_key(&strategy.bot_id.get()) {
            return Err(Error::NotFound {
                entity: "bot",
                id: strategy.bot_id.get(),
            });
        }
        let id = next_id(&mut tables.next_strategy);
        let now = Utc::now();
        let strategy = Strategy {
            id: StrategyId::new(id),
            bot_id: strategy.bot_id,
            name: strategy.name,
            pattern: strategy.pattern,
            need: strategy.need,
            action: strategy.action,
            use_default_message: strategy.use_default_message,
            custom_message: strategy.custom_message,
            start_time: strategy.start_time,
            end_time: strategy.end_time,
            is_active: strategy.is_active,
            counters: StrategyCounters::default(),
            created_at: now,
            updated_at: now,
        };
        tables.strategies.insert(id, strategy.clone());
        Ok(strategy)
    }

    async fn get_strategy(&self, id: StrategyId) -> Result<Option<Strategy>> {
        Ok(self.tables.read().strategies.get(&id.get()).cloned())
    }

    async fn list_strategies(&self, bot_id: BotId) -> Result<Vec<Strategy>> {
        Ok(self
            .tables
            .read()
            .strategies
            .values()
            .rev()
            .filter(|s| s.bot_id == bot_id)
            .cloned()
            .collect())
    }

    async fn active_strategies(&self, bot_id: BotId) -> Result<Vec<Strategy>> {
        Ok(self
            .tables
            .read()
            .strategies
            .values()
            .filter(|s| s.bot_id == bot_id && s.is_active)
            .cloned()
            .collect())
    }

    async fn update_strategy(
        &self,
        id: StrategyId,
        patch: StrategyPatch,
    ) -> Result<Option<Strategy>> {
        let mut tables = self.tables.write();
        Ok(tables.strategies.get_mut(&id.get()).map(|strategy| {
            patch.apply(strategy);
            strategy.updated_at = Utc::now();
            strategy.clone()
        }))
    }

    async fn delete_strategy(&self, id: StrategyId) -> Result<bool> {
        let mut tables = self.tables.write();
        let removed = tables.strategies.remove(&id.get()).is_some();
        if removed {
            tables.results.retain(|_, r| r.strategy_id != id);
        }
        Ok(removed)
    }

    async fn reset_counters(&self, id: StrategyId) -> Result<Option<Strategy>> {
        let mut tables = self.tables.write();
        Ok(tables.strategies.get_mut(&id.get()).map(|strategy| {
            strategy.counters = StrategyCounters::default();
            strategy.updated_at = Utc::now();
            strategy.clone()
        }))
    }
}

#[async_trait]
impl GameResultStore for MemoryStore {
    async fn append_result(&self, result: NewGameResult) -> Result<GameResult> {
        self.tables.write().insert_result(result)
    }

    async fn record_signal(&self, result: NewGameResult) -> Result<GameResult> {
        let mut tables = self.tables.write();
        let recorded = tables.insert_result(result)?;
        if let Some(strategy) = tables.strategies.get_mut(&recorded.strategy_id.get()) {
            strategy.counters.total_signals += 1;
        }
        Ok(recorded)
    }

    async fn get_result(&self, id: i32) -> Result<Option<GameResult>> {
        Ok(self.tables.read().results.get(&id).cloned())
    }

    async fn resolve_result(&self, id: i32, resolution: Resolution) -> Result<Option<GameResult>> {
        let mut tables = self.tables.write();
        let Some(result) = tables.results.get(&id) else {
            return Ok(None);
        };
        if result.resolution.is_some() {
            return Err(Error::Validation(format!("game result {id} is already resolved")));
        }
        let strategy_id = result.strategy_id.get();

        if let Some(strategy) = tables.strategies.get_mut(&strategy_id) {
            strategy.counters.apply(resolution);
            strategy.updated_at = Utc::now();
        }
        let Some(result) = tables.results.get_mut(&id) else {
            return Ok(None);
        };
        result.resolution = Some(resolution);
        result.resolved_at = Some(Utc::now());
        Ok(Some(result.clone()))
    }

    async fn recent_results(
        &self,
        strategy_id: StrategyId,
        limit: usize,
    ) -> Result<Vec<GameResult>> {
        Ok(self
            .tables
            .read()
            .results
            .values()
            .rev()
            .filter(|r| r.strategy_id == strategy_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
