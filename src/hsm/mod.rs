//! State machines with entry and exit hooks around every transition.
//!
//! Each state is a variant of a `State` enum. A `Behavior` handles a
//! `Trigger` for a given state and answers with an `Outcome`. When the
//! outcome is a transition, the machine delivers `Exit` to the old state,
//! switches the current state, then delivers `Entry` to the new state, all
//! on the dispatching thread.
//!
//! # Example
//!
//! ```rust
//! use fsmloop::core::{Event, Signal, State};
//! use fsmloop::hsm::{Behavior, Hsm, Outcome, Trigger};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! enum Door {
//!     Closed,
//!     Open,
//! }
//!
//! impl State for Door {
//!     fn name(&self) -> &str {
//!         match self {
//!             Self::Closed => "Closed",
//!             Self::Open => "Open",
//!         }
//!     }
//! }
//!
//! const PUSH: Signal = Signal(4);
//!
//! #[derive(Default)]
//! struct Hinge {
//!     log: Vec<String>,
//! }
//!
//! impl Behavior for Hinge {
//!     type State = Door;
//!     type Payload = ();
//!
//!     fn initial(&mut self) -> Outcome<Door> {
//!         Outcome::Transition(Door::Closed)
//!     }
//!
//!     fn handle(&mut self, state: &Door, trigger: Trigger<'_, ()>) -> Outcome<Door> {
//!         match (state, trigger) {
//!             (_, Trigger::Entry) => {
//!                 self.log.push(format!("enter {}", state.name()));
//!                 Outcome::Handled
//!             }
//!             (_, Trigger::Exit) => {
//!                 self.log.push(format!("exit {}", state.name()));
//!                 Outcome::Handled
//!             }
//!             (Door::Closed, Trigger::Event(e)) if e.signal == PUSH => Outcome::Transition(Door::Open),
//!             _ => Outcome::Ignored,
//!         }
//!     }
//! }
//!
//! let mut door = Hsm::new(Hinge::default());
//! door.init().unwrap();
//! door.dispatch(&Event::new(PUSH)).unwrap();
//!
//! assert_eq!(door.current(), Some(&Door::Open));
//! assert_eq!(door.behavior().log, ["enter Closed", "exit Closed", "enter Open"]);
//! ```

mod error;
mod machine;

pub use error::HsmError;
pub use machine::Hsm;

pub use crate::builder::HsmBuilder;

use crate::core::{Event, Signal, State};
use std::fmt;

/// Answer of a state handler.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<S> {
    /// Event consumed, state unchanged
    Handled,

    /// Event not relevant in this state
    Ignored,

    /// Move to the given state
    Transition(S),
}

impl<S> Outcome<S> {
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transition(_))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Handled => "Handled",
            Self::Ignored => "Ignored",
            Self::Transition(_) => "Transition",
        }
    }
}

/// What a state handler is being asked to react to.
#[derive(Debug)]
pub enum Trigger<'e, P> {
    /// The state was just entered
    Entry,

    /// The state is about to be left
    Exit,

    /// A real event from the control loop or caller
    Event(&'e Event<P>),
}

impl<P> Trigger<'_, P> {
    /// Signal of a real event; `None` for the Entry/Exit pseudo-events.
    pub fn signal(&self) -> Option<Signal> {
        match self {
            Self::Event(event) => Some(event.signal),
            Self::Entry | Self::Exit => None,
        }
    }
}

/// Lifecycle hook in which a handler misbehaved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    Entry,
    Exit,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("Entry"),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

/// Domain logic plugged into an `Hsm`.
///
/// The implementor owns the domain data ("me"); the machine owns the current
/// state and calls `handle` with it.
pub trait Behavior {
    type State: State;
    type Payload;

    /// The Init pseudo-event. Must answer with `Outcome::Transition` naming
    /// the first state.
    fn initial(&mut self) -> Outcome<Self::State>;

    /// React to `trigger` while in `state`.
    ///
    /// Answers to `Entry` and `Exit` may not be transitions.
    fn handle(
        &mut self,
        state: &Self::State,
        trigger: Trigger<'_, Self::Payload>,
    ) -> Outcome<Self::State>;

    /// Return true once to have the control loop restart its tick sub-counter
    /// at 0 before the next tick.
    fn take_tick_resync(&mut self) -> bool {
        false
    }
}
