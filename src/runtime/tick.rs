//! Tick sub-counter.

use crate::core::Tick;

/// Produces `Tick` payloads whose `sub_count` runs `0..base` and wraps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickCounter {
    next: u8,
    base: u8,
}

impl TickCounter {
    /// A `base` of 0 is treated as 1 (every tick carries 0).
    pub fn new(base: u8) -> Self {
        Self {
            next: 0,
            base: base.max(1),
        }
    }

    /// Payload for the next tick; the first one carries 0.
    pub fn next_tick(&mut self) -> Tick {
        let tick = Tick {
            sub_count: self.next,
        };
        self.next = (self.next + 1) % self.base;
        tick
    }

    /// Restart the sequence so the next tick carries 0.
    pub fn resync(&mut self) {
        self.next = 0;
    }

    pub fn base(&self) -> u8 {
        self.base
    }
}
