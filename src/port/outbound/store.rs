//! Configuration store ports for bots, strategies, and game results.
//!
//! The signal pipeline only reads bots and strategies and records dispatched
//! signals; full CRUD is exposed for the configuration use cases.

use async_trait::async_trait;

use crate::domain::{
    Bot, BotId, BotPatch, GameResult, NewBot, NewGameResult, NewStrategy, Resolution, Strategy,
    StrategyId, StrategyPatch,
};
use crate::error::Result;

/// Storage operations for bots.
#[async_trait]
pub trait BotStore: Send + Sync {
    /// Insert a bot and return the stored record.
    async fn create_bot(&self, bot: NewBot) -> Result<Bot>;

    async fn get_bot(&self, id: BotId) -> Result<Option<Bot>>;

    /// All bots, newest first.
    async fn list_bots(&self) -> Result<Vec<Bot>>;

    /// Apply a partial update. Returns `None` when the bot does not exist.
    async fn update_bot(&self, id: BotId, patch: BotPatch) -> Result<Option<Bot>>;

    /// Delete a bot together with its strategies and their results.
    async fn delete_bot(&self, id: BotId) -> Result<bool>;

    /// Most recently created active bot with credentials, optionally
    /// restricted to a game type.
    async fn latest_eligible_bot(&self, game_type: Option<&str>) -> Result<Option<Bot>>;
}

/// Storage operations for strategies.
#[async_trait]
pub trait StrategyStore: Send + Sync {
    /// Insert a strategy. The owning bot must exist.
    async fn create_strategy(&self, strategy: NewStrategy) -> Result<Strategy>;

    async fn get_strategy(&self, id: StrategyId) -> Result<Option<Strategy>>;

    /// All strategies of a bot, newest first.
    async fn list_strategies(&self, bot_id: BotId) -> Result<Vec<Strategy>>;

    /// Active strategies of a bot, oldest first (evaluation order).
    async fn active_strategies(&self, bot_id: BotId) -> Result<Vec<Strategy>>;

    async fn update_strategy(&self, id: StrategyId, patch: StrategyPatch)
        -> Result<Option<Strategy>>;

    async fn delete_strategy(&self, id: StrategyId) -> Result<bool>;

    /// Zero all counters atomically. Returns the updated record.
    async fn reset_counters(&self, id: StrategyId) -> Result<Option<Strategy>>;
}

/// Storage operations for dispatched signal records.
#[async_trait]
pub trait GameResultStore: Send + Sync {
    async fn append_result(&self, result: NewGameResult) -> Result<GameResult>;

    /// Append a dispatched result and increment its strategy's
    /// `total_signals` in one step. Neither change is kept if either fails.
    async fn record_signal(&self, result: NewGameResult) -> Result<GameResult>;

    async fn get_result(&self, id: i32) -> Result<Option<GameResult>>;

    /// Mark a result resolved and apply the outcome to its strategy counters
    /// in one step. Returns `None` when the result does not exist.
    async fn resolve_result(&self, id: i32, resolution: Resolution) -> Result<Option<GameResult>>;

    /// Latest results for a strategy, newest first.
    async fn recent_results(&self, strategy_id: StrategyId, limit: usize)
        -> Result<Vec<GameResult>>;
}

/// The full configuration store.
pub trait ConfigStore: BotStore + StrategyStore + GameResultStore {}

impl<T: BotStore + StrategyStore + GameResultStore> ConfigStore for T {}
