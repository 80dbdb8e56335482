//! Dedup ledger: the last event index at which each stage fired.
//!
//! Lanes are per bot, so a ledger entry is keyed by the pattern identifier
//! and stage alone. Two strategies of one bot sharing a pattern therefore
//! fire once per event between them; the older strategy wins.

use std::collections::HashMap;

use crate::domain::Stage;

/// Per-bot dedup ledger.
#[derive(Debug, Default)]
pub struct DedupLedger {
    fired: HashMap<(String, Stage), u64>,
}

impl DedupLedger {
    /// False iff `pattern` already fired `stage` for `event_index`.
    #[must_use]
    pub fn should_fire(&self, pattern: &str, stage: Stage, event_index: u64) -> bool {
        self.last_fired(pattern, stage)
            .map_or(true, |last| last != event_index)
    }

    pub fn record(&mut self, pattern: &str, stage: Stage, event_index: u64) {
        self.fired.insert((pattern.to_string(), stage), event_index);
    }

    /// Check and record in one step. Returns whether the caller may fire.
    pub fn claim(&mut self, pattern: &str, stage: Stage, event_index: u64) -> bool {
        if !self.should_fire(pattern, stage, event_index) {
            return false;
        }
        self.record(pattern, stage, event_index);
        true
    }

    #[must_use]
    pub fn last_fired(&self, pattern: &str, stage: Stage) -> Option<u64> {
        self.fired.get(&(pattern.to_string(), stage)).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fired.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOWS: &str = "low-mults";

    #[test]
    fn unseen_pattern_fires() {
        let ledger = DedupLedger::default();
        assert!(ledger.should_fire(LOWS, Stage::Pre, 1));
    }

    #[test]
    fn same_event_is_suppressed_after_record() {
        let mut ledger = DedupLedger::default();
        assert!(ledger.should_fire(LOWS, Stage::Confirmed, 4));
        ledger.record(LOWS, Stage::Confirmed, 4);
        assert!(!ledger.should_fire(LOWS, Stage::Confirmed, 4));
        assert!(ledger.should_fire(LOWS, Stage::Confirmed, 5));
    }

    #[test]
    fn stages_are_tracked_separately() {
        let mut ledger = DedupLedger::default();
        assert!(ledger.claim(LOWS, Stage::Pre, 3));
        assert!(ledger.claim(LOWS, Stage::Confirmed, 3));
        assert!(!ledger.claim(LOWS, Stage::Pre, 3));
        assert_eq!(ledger.last_fired(LOWS, Stage::Pre), Some(3));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn second_claim_on_a_shared_pattern_is_refused() {
        let mut ledger = DedupLedger::default();
        assert!(ledger.claim(LOWS, Stage::Confirmed, 7));
        assert!(!ledger.claim(LOWS, Stage::Confirmed, 7));
        assert!(ledger.claim("high-mults", Stage::Confirmed, 7));
    }
}
