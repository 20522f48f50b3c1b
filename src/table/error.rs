//! Flat table dispatch errors.

use crate::core::StateId;
use thiserror::Error;

/// Errors reported by a `TableMachine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// A handler left the machine outside `0..state_count`, or the machine
    /// was never initialized. The machine stays corrupted until `init()`.
    #[error("Machine is in invalid state {state} (state count {state_count})")]
    InvalidState { state: StateId, state_count: u16 },
}
