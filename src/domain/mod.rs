//! Pure domain types shared by every layer.

pub mod bot;
pub mod game;
pub mod id;
pub mod pattern;
pub mod strategy;
pub mod window;

pub use bot::{Bot, BotPatch, Credentials, NewBot};
pub use game::{GameResult, NewGameResult};
pub use id::{BotId, StrategyId};
pub use pattern::{Evaluation, MatchState, OutcomeToken, Pattern, Stage};
pub use strategy::{NewStrategy, Resolution, Strategy, StrategyCounters, StrategyPatch};
pub use window::ActiveWindow;
