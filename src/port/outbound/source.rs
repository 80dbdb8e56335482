//! Outcome source port used by background pollers.

use async_trait::async_trait;

use crate::domain::Bot;
use crate::error::Result;

/// Supplies the next outcome value for a bot.
///
/// `Ok(None)` means nothing new is available this tick.
#[async_trait]
pub trait OutcomeSource: Send + Sync {
    async fn next_value(&self, bot: &Bot) -> Result<Option<f64>>;

    fn name(&self) -> &'static str;
}
