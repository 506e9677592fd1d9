//! Lamport clock for per-replica operation counters

use serde::{Deserialize, Serialize};

/// Lamport timestamp for causality tracking
///
/// Each replica ticks its clock once per local operation. Counters observed
/// from other replicas push the clock past them, so a later local operation
/// never reuses a counter value already seen anywhere.
///
/// # Example
///
/// ```rust
/// use lseq_text::crdt::sequence::LamportClock;
///
/// let mut clock = LamportClock::new();
/// assert_eq!(clock.tick(), 1);
///
/// clock.merge(5);  // Counter observed from a remote replica
/// assert_eq!(clock.value(), 6);  // max(1, 5) + 1
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LamportClock {
    value: u64,
}

impl LamportClock {
    /// Create a new Lamport clock starting at 0
    pub fn new() -> Self {
        Self { value: 0 }
    }

    /// Get the current clock value
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Increment clock and return new value (for local operations)
    pub fn tick(&mut self) -> u64 {
        self.value += 1;
        self.value
    }

    /// Merge a remote counter: `max(local, remote) + 1`
    pub fn merge(&mut self, remote: u64) -> u64 {
        self.value = self.value.max(remote) + 1;
        self.value
    }

    /// Raise the clock to at least `floor` without ticking
    pub fn advance_to(&mut self, floor: u64) {
        self.value = self.value.max(floor);
    }
}
