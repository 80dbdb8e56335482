//! Fixed-capacity outcome history for a single bot.

use std::collections::VecDeque;

/// Default number of outcomes retained per bot.
pub const DEFAULT_RING_CAPACITY: usize = 20;

/// Bounded FIFO of recent outcome values, oldest first.
#[derive(Debug, Clone)]
pub struct OutcomeRing {
    capacity: usize,
    values: VecDeque<f64>,
}

impl OutcomeRing {
    /// Create an empty ring. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a value, evicting the oldest entries beyond capacity.
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    /// Contents in arrival order.
    #[must_use]
    pub fn tail(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Contents as a contiguous slice, oldest first.
    pub fn as_slice(&mut self) -> &[f64] {
        self.values.make_contiguous()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for OutcomeRing {
    fn default() -> Self {
        Self::new(DEFAULT_RING_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_values_in_order() {
        let mut ring = OutcomeRing::new(3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            ring.push(v);
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.tail(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn overflow_by_many_stays_at_capacity() {
        let mut ring = OutcomeRing::default();
        for i in 0..57 {
            ring.push(f64::from(i));
        }
        assert_eq!(ring.len(), DEFAULT_RING_CAPACITY);
        let expected: Vec<f64> = (37..57).map(f64::from).collect();
        assert_eq!(ring.tail(), expected);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut ring = OutcomeRing::new(0);
        ring.push(1.5);
        ring.push(2.5);
        assert_eq!(ring.capacity(), 1);
        assert_eq!(ring.as_slice(), &[2.5]);
    }
}
