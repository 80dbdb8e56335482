//! Per-bot event counter used as the dedup token.

/// Monotonic event counter. The first call to [`EventCounter::next`] returns 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounter(u64);

impl EventCounter {
    /// Increment and return the new value.
    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    /// Last value handed out, 0 before the first event.
    #[must_use]
    pub const fn current(&self) -> u64 {
        self.0
    }
}
