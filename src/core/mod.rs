//! Core vocabulary shared by both dispatcher flavors.
//!
//! - Signals and state ids as small unsigned newtypes
//! - Events carrying an optional, single typed payload
//! - The `State` trait for enum-based machines
//! - Bounded history of recent transitions

mod event;
mod history;
mod state;

pub use event::{Event, Signal, StateId, Tick};
pub use history::{StateHistory, StateTransition};
pub use state::State;
