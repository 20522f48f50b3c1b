//! Entry/exit dispatcher errors.

use super::Hook;
use thiserror::Error;

/// Errors reported by an `Hsm`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HsmError {
    #[error("Machine not initialized. Call init() before dispatch()")]
    NotInitialized,

    #[error("Initial handler must return a transition, got {outcome}")]
    InitialMustTransition { outcome: &'static str },

    /// Transitions requested from Entry/Exit are not followed. The primary
    /// transition has already completed when this is reported.
    #[error("{hook} hook of '{state}' requested a transition to '{target}'")]
    TransitionInHook {
        hook: Hook,
        state: String,
        target: String,
    },
}
