//! Active-window filter applied before evaluation.

use chrono::NaiveTime;
use tracing::warn;

use crate::domain::Strategy;

/// Whether `strategy` is inside its configured hours at `now`.
///
/// A malformed bound never aborts the pipeline: the strategy is treated as
/// unrestricted and a warning is logged.
#[must_use]
pub fn in_window(strategy: &Strategy, now: NaiveTime) -> bool {
    match strategy.window().check(now) {
        Ok(active) => active,
        Err(err) => {
            warn!(
                strategy_id = %strategy.id,
                bound = %err.value,
                "Malformed time window, treating strategy as unrestricted"
            );
            true
        }
    }
}
