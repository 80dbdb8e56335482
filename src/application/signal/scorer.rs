//! Confidence scorers.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::port::outbound::scorer::{ConfidenceScorer, ScoreInput};

/// Deterministic score from the matching tail: `min(85, 50 + 10 * tail)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TailScorer;

impl ConfidenceScorer for TailScorer {
    fn score(&self, input: &ScoreInput<'_>) -> u8 {
        let raw = 50usize.saturating_add(input.tail.saturating_mul(10));
        raw.min(85) as u8
    }

    fn name(&self) -> &'static str {
        "tail"
    }
}

/// Base 70, +10 once more than 50 outcomes are retained, then a ±15 jitter
/// drawn from a seeded generator, clamped to 50..=95.
pub struct SeededScorer {
    rng: Mutex<StdRng>,
}

impl SeededScorer {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ConfidenceScorer for SeededScorer {
    fn score(&self, input: &ScoreInput<'_>) -> u8 {
        let mut base: i32 = 70;
        if input.history_len > 50 {
            base += 10;
        }
        let jitter = self.rng.lock().gen_range(-15..=15);
        (base + jitter).clamp(50, 95) as u8
    }

    fn name(&self) -> &'static str {
        "seeded"
    }
}
