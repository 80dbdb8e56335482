//! Configuration use cases for bots, strategies, and dispatched results.
//!
//! Thin layer over the [`ConfigStore`] that validates input and turns
//! missing records into [`Error::NotFound`].

use std::sync::Arc;

use tracing::info;

use crate::application::signal::SignalState;
use crate::domain::window::parse_time_of_day;
use crate::domain::{
    Bot, BotId, BotPatch, GameResult, NewBot, NewStrategy, Resolution, Strategy, StrategyId,
    StrategyPatch,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::ConfigStore;

/// Configuration service.
pub struct Catalog {
    store: Arc<dyn ConfigStore>,
    state: Option<Arc<SignalState>>,
}

impl Catalog {
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store, state: None }
    }

    /// Attach the live signal state so deleted bots drop their lanes.
    #[must_use]
    pub fn with_state(mut self, state: Arc<SignalState>) -> Self {
        self.state = Some(state);
        self
    }

    pub async fn add_bot(&self, bot: NewBot) -> Result<Bot> {
        require_text("name", &bot.name)?;
        require_text("game_type", &bot.game_type)?;
        let bot = self.store.create_bot(bot).await?;
        info!(bot_id = %bot.id, game_type = %bot.game_type, "Bot created");
        Ok(bot)
    }

    pub async fn bot(&self, id: BotId) -> Result<Bot> {
        self.store.get_bot(id).await?.ok_or(not_found("bot", id.get()))
    }

    pub async fn bots(&self) -> Result<Vec<Bot>> {
        self.store.list_bots().await
    }

    pub async fn update_bot(&self, id: BotId, patch: BotPatch) -> Result<Bot> {
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        if let Some(game_type) = &patch.game_type {
            require_text("game_type", game_type)?;
        }
        self.store
            .update_bot(id, patch)
            .await?
            .ok_or(not_found("bot", id.get()))
    }

    /// Delete a bot and, with it, its strategies.
    pub async fn remove_bot(&self, id: BotId) -> Result<()> {
        if !self.store.delete_bot(id).await? {
            return Err(not_found("bot", id.get()));
        }
        if let Some(state) = &self.state {
            state.forget(id);
        }
        info!(bot_id = %id, "Bot deleted");
        Ok(())
    }

    /// Create a strategy under an existing bot.
    pub async fn add_strategy(&self, strategy: NewStrategy) -> Result<Strategy> {
        self.bot(strategy.bot_id).await?;
        require_text("name", &strategy.name)?;
        require_text("pattern", &strategy.pattern)?;
        require_need(strategy.need)?;
        require_time("start_time", strategy.start_time.as_deref())?;
        require_time("end_time", strategy.end_time.as_deref())?;

        let strategy = self.store.create_strategy(strategy).await?;
        info!(
            strategy_id = %strategy.id,
            bot_id = %strategy.bot_id,
            pattern = %strategy.pattern,
            "Strategy created"
        );
        Ok(strategy)
    }

    pub async fn strategy(&self, id: StrategyId) -> Result<Strategy> {
        self.store
            .get_strategy(id)
            .await?
            .ok_or(not_found("strategy", id.get()))
    }

    /// Strategies of an existing bot, newest first.
    pub async fn strategies(&self, bot_id: BotId) -> Result<Vec<Strategy>> {
        self.bot(bot_id).await?;
        self.store.list_strategies(bot_id).await
    }

    pub async fn update_strategy(&self, id: StrategyId, patch: StrategyPatch) -> Result<Strategy> {
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        if let Some(pattern) = &patch.pattern {
            require_text("pattern", pattern)?;
        }
        if let Some(need) = patch.need {
            require_need(need)?;
        }
        require_time("start_time", patch.start_time.as_deref())?;
        require_time("end_time", patch.end_time.as_deref())?;

        self.store
            .update_strategy(id, patch)
            .await?
            .ok_or(not_found("strategy", id.get()))
    }

    pub async fn remove_strategy(&self, id: StrategyId) -> Result<()> {
        if !self.store.delete_strategy(id).await? {
            return Err(not_found("strategy", id.get()));
        }
        info!(strategy_id = %id, "Strategy deleted");
        Ok(())
    }

    /// Zero every counter of a strategy.
    pub async fn reset_strategy(&self, id: StrategyId) -> Result<Strategy> {
        let strategy = self
            .store
            .reset_counters(id)
            .await?
            .ok_or(not_found("strategy", id.get()))?;
        info!(strategy_id = %id, "Strategy counters reset");
        Ok(strategy)
    }

    /// Record how a dispatched signal turned out.
    pub async fn resolve(&self, result_id: i32, resolution: Resolution) -> Result<GameResult> {
        let result = self
            .store
            .resolve_result(result_id, resolution)
            .await?
            .ok_or(not_found("game result", result_id))?;
        info!(
            result_id,
            strategy_id = %result.strategy_id,
            resolution = resolution.as_str(),
            "Signal resolved"
        );
        Ok(result)
    }

    /// Latest dispatched results of a strategy, newest first.
    pub async fn history(&self, strategy_id: StrategyId, limit: usize) -> Result<Vec<GameResult>> {
        self.strategy(strategy_id).await?;
        self.store.recent_results(strategy_id, limit).await
    }
}

const fn not_found(entity: &'static str, id: i32) -> Error {
    Error::NotFound { entity, id }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_need(need: u32) -> Result<()> {
    if need == 0 {
        return Err(Error::Validation("need must be at least 1".into()));
    }
    Ok(())
}

/// Blank bounds mean "no restriction" and are accepted.
fn require_time(field: &str, value: Option<&str>) -> Result<()> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => parse_time_of_day(raw)
            .map(|_| ())
            .map_err(|err| Error::Validation(format!("{field}: {err}"))),
        None => Ok(()),
    }
}
