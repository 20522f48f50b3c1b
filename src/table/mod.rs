//! Flat table-driven state machines.
//!
//! A `StateTable` is a rectangular `state_count × signal_count` matrix of
//! handlers. Dispatch looks up `state * signal_count + signal` in O(1) and
//! calls the handler with the machine `Instance` and the event. There are no
//! entry/exit hooks: a handler transitions by calling
//! `Instance::transition` and does any setup for the target state itself.
//!
//! # Example
//!
//! ```rust
//! use fsmloop::core::{Event, Signal, StateId};
//! use fsmloop::table::{StepResult, TableBuilder, TableMachine};
//! use std::sync::Arc;
//!
//! const IDLE: StateId = StateId(0);
//! const RUNNING: StateId = StateId(1);
//! const START: Signal = Signal(0);
//!
//! let table = TableBuilder::<u32, ()>::new(2, 1)
//!     .initial(|me| me.transition(IDLE))
//!     .on(IDLE, START, |me, _| {
//!         me.data += 1;
//!         me.transition(RUNNING);
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut machine = TableMachine::new(Arc::new(table), 0);
//! machine.init().unwrap();
//!
//! let step = machine.dispatch(&Event::new(START)).unwrap();
//! assert_eq!(step, StepResult::Transitioned { from: IDLE, to: RUNNING });
//! assert_eq!(*machine.data(), 1);
//! ```

mod error;
mod machine;

pub use error::TableError;
pub use machine::{StepResult, TableMachine};

pub use crate::builder::TableBuilder;

use crate::core::{Event, Signal, StateId};
use std::fmt;

/// Handler stored in one cell of the matrix.
pub type Handler<C, P> = Box<dyn Fn(&mut Instance<C>, &Event<P>) + Send + Sync>;

/// Callback run by `init()`; must move the instance into a valid state.
pub type InitialHandler<C> = Box<dyn Fn(&mut Instance<C>) + Send + Sync>;

/// Mutable view handed to handlers: current state plus the domain data.
#[derive(Debug)]
pub struct Instance<C> {
    state: StateId,
    /// Domain data the handlers operate on
    pub data: C,
    tick_resync: bool,
}

impl<C> Instance<C> {
    pub(crate) fn new(state: StateId, data: C) -> Self {
        Self {
            state,
            data,
            tick_resync: false,
        }
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    /// Make `target` the current state once the handler returns.
    pub fn transition(&mut self, target: StateId) {
        self.state = target;
    }

    /// Ask the control loop to restart the tick sub-counter at 0 before the
    /// next tick.
    pub fn resync_ticks(&mut self) {
        self.tick_resync = true;
    }

    pub(crate) fn set_state(&mut self, state: StateId) {
        self.state = state;
    }

    pub(crate) fn take_tick_resync(&mut self) -> bool {
        std::mem::take(&mut self.tick_resync)
    }
}

/// Immutable transition matrix plus the initial-state callback.
///
/// Built with `TableBuilder`; every cell not configured holds a no-op.
pub struct StateTable<C, P> {
    pub(crate) cells: Box<[Handler<C, P>]>,
    pub(crate) initial: InitialHandler<C>,
    pub(crate) state_count: u16,
    pub(crate) signal_count: u16,
}

impl<C, P> StateTable<C, P> {
    /// The no-op handler filling unconfigured cells.
    pub fn empty(_me: &mut Instance<C>, _event: &Event<P>) {}

    pub fn state_count(&self) -> u16 {
        self.state_count
    }

    pub fn signal_count(&self) -> u16 {
        self.signal_count
    }

    pub fn contains_state(&self, state: StateId) -> bool {
        state.0 < self.state_count
    }

    pub fn contains_signal(&self, signal: Signal) -> bool {
        signal.0 < self.signal_count
    }

    /// Cell for (`state`, `signal`); both must be in range.
    pub(crate) fn handler(&self, state: StateId, signal: Signal) -> &Handler<C, P> {
        &self.cells[state.index() * usize::from(self.signal_count) + signal.index()]
    }
}

impl<C, P> fmt::Debug for StateTable<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateTable")
            .field("state_count", &self.state_count)
            .field("signal_count", &self.signal_count)
            .finish_non_exhaustive()
    }
}
