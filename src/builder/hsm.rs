//! Builder for entry/exit machines.

use crate::core::StateHistory;
use crate::hsm::{Behavior, Hsm};

/// Builder for an `Hsm` with a fluent API.
pub struct HsmBuilder<B: Behavior> {
    behavior: B,
    history_limit: usize,
}

impl<B: Behavior> HsmBuilder<B> {
    /// Create a builder around the domain behavior.
    pub fn new(behavior: B) -> Self {
        Self {
            behavior,
            history_limit: StateHistory::<B::State>::DEFAULT_LIMIT,
        }
    }

    /// Number of transitions kept in the machine's history. 0 disables it.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Build the (uninitialized) machine.
    pub fn build(self) -> Hsm<B> {
        Hsm::with_history(self.behavior, StateHistory::with_limit(self.history_limit))
    }
}
