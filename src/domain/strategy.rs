//! Strategy records: a named pattern rule owned by a bot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{BotId, StrategyId};
use super::pattern::Pattern;
use super::window::ActiveWindow;

/// Cumulative signal counters.
///
/// Monotonically non-decreasing; only an explicit reset zeroes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyCounters {
    pub total_signals: i32,
    pub wins: i32,
    pub losses: i32,
    pub wins_with_gale: i32,
    pub wins_no_gale: i32,
}

impl StrategyCounters {
    /// Win rate as a rounded percentage of resolved signals.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        let resolved = i64::from(self.wins) + i64::from(self.losses);
        if resolved <= 0 {
            return 0;
        }
        let pct = (f64::from(self.wins) / resolved as f64) * 100.0;
        pct.round() as u32
    }

    /// Apply a resolution to the counters.
    pub fn apply(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Win { gale } => {
                self.wins += 1;
                if gale {
                    self.wins_with_gale += 1;
                } else {
                    self.wins_no_gale += 1;
                }
            }
            Resolution::Loss => self.losses += 1,
        }
    }
}

/// How a dispatched signal eventually turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum Resolution {
    /// The entry won; `gale` marks a win that needed a martingale follow-up.
    Win { gale: bool },
    Loss,
}

impl Resolution {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Win { gale: true } => "win_gale",
            Self::Win { gale: false } => "win",
            Self::Loss => "loss",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "win" => Some(Self::Win { gale: false }),
            "win_gale" | "win-gale" | "gale" => Some(Self::Win { gale: true }),
            "loss" | "red" => Some(Self::Loss),
            _ => None,
        }
    }
}

/// A named pattern-matching rule with its messaging preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: StrategyId,
    pub bot_id: BotId,
    pub name: String,
    /// Identifier selecting matcher logic, e.g. `low-mults`.
    pub pattern: String,
    /// Required run length.
    pub need: u32,
    /// Action label reported in messages.
    pub action: String,
    pub use_default_message: bool,
    pub custom_message: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: bool,
    #[serde(flatten)]
    pub counters: StrategyCounters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Strategy {
    #[must_use]
    pub fn parsed_pattern(&self) -> Pattern {
        Pattern::parse(&self.pattern)
    }

    #[must_use]
    pub fn window(&self) -> ActiveWindow {
        ActiveWindow::new(self.start_time.clone(), self.end_time.clone())
    }

    /// Custom template to render, if the strategy opted out of the default.
    #[must_use]
    pub fn custom_template(&self) -> Option<&str> {
        if self.use_default_message {
            return None;
        }
        self.custom_message
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Fields for creating a strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStrategy {
    pub bot_id: BotId,
    pub name: String,
    pub pattern: String,
    #[serde(default = "default_need")]
    pub need: u32,
    pub action: String,
    #[serde(default = "default_true")]
    pub use_default_message: bool,
    #[serde(default)]
    pub custom_message: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_need() -> u32 {
    3
}

const fn default_true() -> bool {
    true
}

/// Partial update for a strategy. Counters are not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategyPatch {
    pub name: Option<String>,
    pub pattern: Option<String>,
    pub need: Option<u32>,
    pub action: Option<String>,
    pub use_default_message: Option<bool>,
    pub custom_message: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: Option<bool>,
}

impl StrategyPatch {
    /// Apply the patch to an in-memory record.
    pub fn apply(&self, strategy: &mut Strategy) {
        if let Some(name) = &self.name {
            strategy.name.clone_from(name);
        }
        if let Some(pattern) = &self.pattern {
            strategy.pattern.clone_from(pattern);
        }
        if let Some(need) = self.need {
            strategy.need = need;
        }
        if let Some(action) = &self.action {
            strategy.action.clone_from(action);
        }
        if let Some(flag) = self.use_default_message {
            strategy.use_default_message = flag;
        }
        if let Some(message) = &self.custom_message {
            strategy.custom_message = Some(message.clone());
        }
        if let Some(start) = &self.start_time {
            strategy.start_time = Some(start.clone());
        }
        if let Some(end) = &self.end_time {
            strategy.end_time = Some(end.clone());
        }
        if let Some(active) = self.is_active {
            strategy.is_active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_rounds_resolved_share() {
        let counters = StrategyCounters {
            wins: 2,
            losses: 1,
            ..Default::default()
        };
        assert_eq!(counters.accuracy_percent(), 67);
        assert_eq!(StrategyCounters::default().accuracy_percent(), 0);
    }

    #[test]
    fn resolution_updates_gale_split() {
        let mut counters = StrategyCounters::default();
        counters.apply(Resolution::Win { gale: true });
        counters.apply(Resolution::Win { gale: false });
        counters.apply(Resolution::Loss);

        assert_eq!(counters.wins, 2);
        assert_eq!(counters.wins_with_gale, 1);
        assert_eq!(counters.wins_no_gale, 1);
        assert_eq!(counters.losses, 1);
    }

    #[test]
    fn resolution_parses_cli_words() {
        assert_eq!(Resolution::parse("WIN"), Some(Resolution::Win { gale: false }));
        assert_eq!(Resolution::parse("win_gale"), Some(Resolution::Win { gale: true }));
        assert_eq!(Resolution::parse("loss"), Some(Resolution::Loss));
        assert_eq!(Resolution::parse("draw"), None);
    }
}
