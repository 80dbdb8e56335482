//! Bounded per-game-type outcome history and summaries.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;

use crate::port::inbound::{Distribution, HistoryEntry, StatsSummary};

/// Default number of outcomes retained per game type.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Default number of entries in a summary's recent list.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Observational history of received outcomes, grouped by game type.
///
/// Purely read-only with respect to dispatch.
#[derive(Debug)]
pub struct StatisticsAggregator {
    capacity: usize,
    recent_limit: usize,
    history: RwLock<HashMap<String, VecDeque<HistoryEntry>>>,
}

impl StatisticsAggregator {
    #[must_use]
    pub fn new(capacity: usize, recent_limit: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            recent_limit,
            history: RwLock::new(HashMap::new()),
        }
    }

    /// Append an entry, evicting the oldest beyond capacity.
    pub fn record(&self, game_type: &str, entry: HistoryEntry) {
        let mut history = self.history.write();
        let entries = history.entry(normalize(game_type)).or_default();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Number of retained entries for a game type.
    #[must_use]
    pub fn len(&self, game_type: &str) -> usize {
        self.history
            .read()
            .get(&normalize(game_type))
            .map_or(0, VecDeque::len)
    }

    #[must_use]
    pub fn summary(&self, game_type: &str) -> StatsSummary {
        let key = normalize(game_type);
        let history = self.history.read();
        let Some(entries) = history.get(&key) else {
            return StatsSummary {
                game_type: key,
                total_count: 0,
                recent: Vec::new(),
                last_update: None,
                distribution: None,
            };
        };

        let values: Vec<f64> = entries.iter().map(|e| e.value).collect();
        StatsSummary {
            total_count: entries.len(),
            recent: entries.iter().rev().take(self.recent_limit).cloned().collect(),
            last_update: entries.back().map(|e| e.recorded_at),
            distribution: distribution(&values),
            game_type: key,
        }
    }
}

impl Default for StatisticsAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY, DEFAULT_RECENT_LIMIT)
    }
}

fn normalize(game_type: &str) -> String {
    game_type.trim().to_ascii_lowercase()
}

/// Min, max, mean and percentiles of `values`. `None` when empty.
#[must_use]
pub fn distribution(values: &[f64]) -> Option<Distribution> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let sum: f64 = sorted.iter().sum();
    Some(Distribution {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean: sum / sorted.len() as f64,
        p50: percentile(&sorted, 50.0),
        p90: percentile(&sorted, 90.0),
        p99: percentile(&sorted, 99.0),
    })
}

/// Linear-interpolated percentile over a sorted, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
