//! Process-wide in-memory signal state.
//!
//! Each bot owns a lane (ring buffer, event counter, dedup ledger) behind its
//! own mutex. Events for different bots never contend; events for the same
//! bot are serialized through the lane. Nothing here is persisted: state
//! starts empty and lives as long as the process.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use super::counter::EventCounter;
use super::ledger::DedupLedger;
use super::ring::{OutcomeRing, DEFAULT_RING_CAPACITY};
use crate::domain::BotId;

/// Mutable state for a single bot.
#[derive(Debug)]
pub struct BotLane {
    pub ring: OutcomeRing,
    pub counter: EventCounter,
    pub ledger: DedupLedger,
}

impl BotLane {
    #[must_use]
    pub fn new(ring_capacity: usize) -> Self {
        Self {
            ring: OutcomeRing::new(ring_capacity),
            counter: EventCounter::default(),
            ledger: DedupLedger::default(),
        }
    }
}

/// All bot lanes, keyed by bot id.
#[derive(Debug)]
pub struct SignalState {
    ring_capacity: usize,
    lanes: DashMap<BotId, Arc<Mutex<BotLane>>>,
}

impl SignalState {
    #[must_use]
    pub fn new(ring_capacity: usize) -> Self {
        Self {
            ring_capacity,
            lanes: DashMap::new(),
        }
    }

    /// Lane for `bot_id`, created on first use.
    ///
    /// The map shard lock is released before the lane is returned, so
    /// holding a lane never blocks other bots.
    #[must_use]
    pub fn lane(&self, bot_id: BotId) -> Arc<Mutex<BotLane>> {
        self.lanes
            .entry(bot_id)
            .or_insert_with(|| Arc::new(Mutex::new(BotLane::new(self.ring_capacity))))
            .value()
            .clone()
    }

    /// Buffered outcomes for a bot, oldest first. Empty for unknown bots.
    #[must_use]
    pub fn tail(&self, bot_id: BotId) -> Vec<f64> {
        self.existing(bot_id)
            .map(|lane| lane.lock().ring.tail())
            .unwrap_or_default()
    }

    /// Last event index handed out for a bot, 0 if none.
    #[must_use]
    pub fn event_index(&self, bot_id: BotId) -> u64 {
        self.existing(bot_id)
            .map_or(0, |lane| lane.lock().counter.current())
    }

    /// Drop a bot's lane, e.g. after the bot was deleted.
    pub fn forget(&self, bot_id: BotId) -> bool {
        self.lanes.remove(&bot_id).is_some()
    }

    #[must_use]
    pub fn bot_count(&self) -> usize {
        self.lanes.len()
    }

    #[must_use]
    pub const fn ring_capacity(&self) -> usize {
        self.ring_capacity
    }

    fn existing(&self, bot_id: BotId) -> Option<Arc<Mutex<BotLane>>> {
        self.lanes.get(&bot_id).map(|lane| lane.value().clone())
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new(DEFAULT_RING_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bot_has_empty_tail() {
        let state = SignalState::default();
        assert!(state.tail(BotId::new(9)).is_empty());
        assert_eq!(state.event_index(BotId::new(9)), 0);
        assert_eq!(state.bot_count(), 0);
    }

    #[test]
    fn lanes_are_created_lazily_and_shared() {
        let state = SignalState::new(2);
        let bot = BotId::new(1);
        {
            let lane = state.lane(bot);
            let mut lane = lane.lock();
            lane.ring.push(1.5);
            lane.counter.next();
        }
        {
            let lane = state.lane(bot);
            let mut lane = lane.lock();
            lane.ring.push(2.5);
            lane.ring.push(3.5);
            lane.counter.next();
        }
        assert_eq!(state.tail(bot), vec![2.5, 3.5]);
        assert_eq!(state.event_index(bot), 2);
        assert_eq!(state.bot_count(), 1);
    }

    #[test]
    fn bots_do_not_share_counters() {
        let state = SignalState::default();
        let a = state.lane(BotId::new(1));
        let b = state.lane(BotId::new(2));
        a.lock().counter.next();
        a.lock().counter.next();
        assert_eq!(b.lock().counter.next(), 1);
        assert!(state.forget(BotId::new(1)));
        assert_eq!(state.event_index(BotId::new(1)), 0);
    }
}
