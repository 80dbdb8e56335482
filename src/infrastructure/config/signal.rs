//! Signal pipeline and statistics configuration.

use serde::Deserialize;

use crate::application::signal::ring::DEFAULT_RING_CAPACITY;
use crate::application::signal::DispatchSettings;
use crate::application::statistics::{DEFAULT_HISTORY_CAPACITY, DEFAULT_RECENT_LIMIT};

/// Which confidence scorer to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceKind {
    /// Deterministic, derived from the run length.
    #[default]
    Tail,
    /// Base score with seeded jitter.
    Seeded,
}

/// Matching and dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfig {
    /// Outcomes kept per bot.
    #[serde(default = "default_ring_capacity")]
    pub ring_capacity: usize,
    /// Multipliers below this are low (red).
    #[serde(default = "default_low_threshold")]
    pub low_threshold: f64,
    /// Target shown in default messages.
    #[serde(default = "default_target_multiplier")]
    pub target_multiplier: String,
    #[serde(default)]
    pub confidence: ConfidenceKind,
    /// Seed for the seeded scorer. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

const fn default_ring_capacity() -> usize {
    DEFAULT_RING_CAPACITY
}

const fn default_low_threshold() -> f64 {
    2.0
}

fn default_target_multiplier() -> String {
    "2.5x".to_string()
}

impl SignalConfig {
    #[must_use]
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            low_threshold: self.low_threshold,
            target_multiplier: self.target_multiplier.clone(),
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            ring_capacity: default_ring_capacity(),
            low_threshold: default_low_threshold(),
            target_multiplier: default_target_multiplier(),
            confidence: ConfidenceKind::default(),
            seed: None,
        }
    }
}

/// Per-game-type history configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsConfig {
    /// Outcomes retained per game type.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Entries returned as `recent` in summaries.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

const fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

const fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            recent_limit: default_recent_limit(),
        }
    }
}
