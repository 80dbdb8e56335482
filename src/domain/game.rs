//! Persisted record of a dispatched signal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::StrategyId;
use super::pattern::Stage;
use super::strategy::Resolution;

/// Historical fact: a strategy fired on a game outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub id: i32,
    pub strategy_id: StrategyId,
    pub stage: Stage,
    /// Serialized raw game payload that triggered the signal.
    pub game_data: String,
    pub signal_sent: bool,
    pub resolution: Option<Resolution>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Fields for appending a game result.
#[derive(Debug, Clone)]
pub struct NewGameResult {
    pub strategy_id: StrategyId,
    pub stage: Stage,
    pub game_data: String,
    pub signal_sent: bool,
}
