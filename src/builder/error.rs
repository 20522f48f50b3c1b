//! Build errors for tables, machines and control loops.

use crate::core::{Signal, StateId};
use crate::runtime::ConfigError;
use thiserror::Error;

/// Errors that can occur when building tables and control loops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Initial handler not specified. Call .initial(handler) before .build()")]
    MissingInitialHandler,

    #[error("Table needs at least one state and one signal (got {states}x{signals})")]
    EmptyTable { states: u16, signals: u16 },

    #[error("Cell ({state}, {signal}) is outside a {states}x{signals} table")]
    CellOutOfRange {
        state: StateId,
        signal: Signal,
        states: u16,
        signals: u16,
    },

    #[error("Tick signal not specified. Call .tick_signal(signal)")]
    MissingTickSignal,

    #[error("Input decoder not specified. Call .decoder(fn)")]
    MissingDecoder,

    #[error("Invalid loop configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
