//! Pattern identifiers, outcome tokens, and match stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Multiplier treated as the "white" outcome (an instant crash).
pub const WHITE_MULTIPLIER: f64 = 1.0;

const WHITE_EPSILON: f64 = 1e-9;

/// Coarse classification of a single outcome value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeToken {
    /// Below the threshold.
    Red,
    /// At or above the threshold.
    Green,
    /// Exactly 1.00x.
    White,
}

impl OutcomeToken {
    /// Classify a multiplier against the green threshold.
    #[must_use]
    pub fn classify(value: f64, threshold: f64) -> Self {
        if (value - WHITE_MULTIPLIER).abs() < WHITE_EPSILON {
            Self::White
        } else if value >= threshold {
            Self::Green
        } else {
            Self::Red
        }
    }

    /// Parse a token from a letter or colour name.
    ///
    /// Accepts `r`/`red`/`vermelho`, `g`/`green`/`verde`, `b`/`w`/`white`/`branco`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "r" | "red" | "vermelho" => Some(Self::Red),
            "g" | "green" | "verde" => Some(Self::Green),
            "b" | "w" | "white" | "branco" => Some(Self::White),
            _ => None,
        }
    }

    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Green => 'G',
            Self::White => 'B',
        }
    }
}

/// The matching algorithm selected by a strategy's pattern identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Consecutive outcomes below the threshold (`low-mults`).
    LowMults,
    /// Consecutive outcomes at or above the threshold (`high-mults`).
    HighMults,
    /// An exact token sequence ending at the newest outcome (`R-R-G`).
    Sequence(Vec<OutcomeToken>),
    /// Unrecognized identifier: run of outcomes equal to the newest token.
    Streak(String),
}

impl Pattern {
    /// Resolve a pattern identifier. Never fails: unknown identifiers map to
    /// [`Pattern::Streak`].
    #[must_use]
    pub fn parse(id: &str) -> Self {
        let normalized = id.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low-mults" | "low_mults" | "lowmults" => return Self::LowMults,
            "high-mults" | "high_mults" | "highmults" => return Self::HighMults,
            _ => {}
        }

        let parts: Vec<&str> = normalized
            .split(['-', ',', ' '])
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() >= 2 {
            let tokens: Option<Vec<OutcomeToken>> =
                parts.iter().map(|p| OutcomeToken::parse(p)).collect();
            if let Some(tokens) = tokens {
                return Self::Sequence(tokens);
            }
        }

        Self::Streak(id.trim().to_string())
    }

    /// Short human label for messages.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::LowMults => "low-mults".to_string(),
            Self::HighMults => "high-mults".to_string(),
            Self::Sequence(tokens) => tokens
                .iter()
                .map(|t| t.letter().to_string())
                .collect::<Vec<_>>()
                .join("-"),
            Self::Streak(id) => id.clone(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Notification stage of a pattern match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// One observation before the pattern would confirm.
    Pre,
    /// The pattern's full threshold is met.
    Confirmed,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-value view of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    None,
    PreSignal(usize),
    Confirmed(usize),
}

/// Result of running a pattern against a buffer.
///
/// Pre-signal and confirmed are independent stages; either, both, or
/// neither may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// Length of the matching tail.
    pub tail: usize,
    pub pre: bool,
    pub confirmed: bool,
}

impl Evaluation {
    #[must_use]
    pub const fn none(tail: usize) -> Self {
        Self {
            tail,
            pre: false,
            confirmed: false,
        }
    }

    /// Stages reached by this evaluation, pre-signal first.
    pub fn stages(&self) -> impl Iterator<Item = Stage> {
        let pre = self.pre.then_some(Stage::Pre);
        let confirmed = self.confirmed.then_some(Stage::Confirmed);
        pre.into_iter().chain(confirmed)
    }

    #[must_use]
    pub const fn state(&self) -> MatchState {
        if self.confirmed {
            MatchState::Confirmed(self.tail)
        } else if self.pre {
            MatchState::PreSignal(self.tail)
        } else {
            MatchState::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_splits_on_threshold_and_white() {
        assert_eq!(OutcomeToken::classify(1.0, 2.0), OutcomeToken::White);
        assert_eq!(OutcomeToken::classify(1.99, 2.0), OutcomeToken::Red);
        assert_eq!(OutcomeToken::classify(2.0, 2.0), OutcomeToken::Green);
    }

    #[test]
    fn parse_known_identifiers() {
        assert_eq!(Pattern::parse("low-mults"), Pattern::LowMults);
        assert_eq!(Pattern::parse(" High-Mults "), Pattern::HighMults);
    }

    #[test]
    fn parse_color_sequences() {
        assert_eq!(
            Pattern::parse("red-red-green"),
            Pattern::Sequence(vec![
                OutcomeToken::Red,
                OutcomeToken::Red,
                OutcomeToken::Green
            ])
        );
        assert_eq!(Pattern::parse("R-B").label(), "R-B");
    }

    #[test]
    fn unknown_identifier_falls_back_to_streak() {
        assert_eq!(
            Pattern::parse("martian-rain"),
            Pattern::Streak("martian-rain".into())
        );
        assert_eq!(Pattern::parse("x"), Pattern::Streak("x".into()));
    }

    #[test]
    fn evaluation_stage_order() {
        let eval = Evaluation {
            tail: 3,
            pre: true,
            confirmed: true,
        };
        let stages: Vec<_> = eval.stages().collect();
        assert_eq!(stages, vec![Stage::Pre, Stage::Confirmed]);
        assert_eq!(eval.state(), MatchState::Confirmed(3));
        assert_eq!(Evaluation::none(0).state(), MatchState::None);
    }
}
