//! Confidence scoring port.
//!
//! Confidence is a cosmetic display value. Scorers must be deterministic for
//! a given input, or draw from an explicitly seeded source.

use crate::domain::Pattern;

/// Inputs available to a scorer.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub pattern: &'a Pattern,
    pub tail: usize,
    pub need: u32,
    /// Outcomes currently retained for the bot's game type.
    pub history_len: usize,
}

/// Produces the percentage shown next to a signal.
pub trait ConfidenceScorer: Send + Sync {
    /// Score in percent, 0..=100.
    fn score(&self, input: &ScoreInput<'_>) -> u8;

    fn name(&self) -> &'static str;
}
