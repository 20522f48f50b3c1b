//! fsmloop: state machines fed by a bounded event queue and a ticking loop.
//!
//! An input thread pushes opaque items into a `BoundedQueue`. A single
//! consumer thread runs a `ControlLoop`, which waits on the queue with a
//! timeout, synthesizes a tick event whenever the wait times out, and
//! otherwise decodes and dispatches the item to a state machine.
//!
//! # Core Concepts
//!
//! - **Queue**: fixed-capacity FIFO guarded by one mutex and one condvar
//! - **Table**: flat `state × signal` handler matrix with O(1) lookup
//! - **Hsm**: enum states with `Entry`/`Exit` around every transition
//! - **Runtime**: the control loop, tick synthesis and failure policy
//!
//! # Example
//!
//! ```rust
//! use fsmloop::core::{Event, Signal, StateId, Tick};
//! use fsmloop::queue::BoundedQueue;
//! use fsmloop::runtime::{ControlLoop, Decoded};
//! use fsmloop::table::{TableBuilder, TableMachine};
//! use std::sync::Arc;
//!
//! const IDLE: StateId = StateId(0);
//! const ARMED: StateId = StateId(1);
//! const ARM: Signal = Signal(0);
//! const TICK: Signal = Signal(1);
//!
//! let table = TableBuilder::<u32, Tick>::new(2, 2)
//!     .initial(|me| me.transition(IDLE))
//!     .on(IDLE, ARM, |me, _| me.transition(ARMED))
//!     .on(ARMED, TICK, |me, _| me.data += 1)
//!     .build()
//!     .unwrap();
//! let machine = TableMachine::new(Arc::new(table), 0);
//!
//! let queue = Arc::new(BoundedQueue::new(10).unwrap());
//! let handle = ControlLoop::builder(Arc::clone(&queue), machine)
//!     .tick_signal(TICK)
//!     .decoder(|key: char| match key {
//!         'a' => Decoded::Dispatch(Event::new(ARM)),
//!         '\u{1b}' => Decoded::Exit,
//!         _ => Decoded::Discard,
//!     })
//!     .build()
//!     .unwrap()
//!     .spawn()
//!     .unwrap();
//!
//! queue.enqueue('a').unwrap();
//! queue.enqueue('\u{1b}').unwrap();
//!
//! let report = handle.join().unwrap().unwrap();
//! assert_eq!(report.dispatcher.current(), ARMED);
//! ```

pub mod builder;
pub mod core;
pub mod hsm;
pub mod queue;
pub mod runtime;
pub mod table;

// Re-export commonly used types
pub use crate::builder::BuildError;
pub use crate::core::{Event, Signal, State, StateId, Tick};
pub use crate::hsm::{Behavior, Hsm, Outcome, Trigger};
pub use crate::queue::{BoundedQueue, QueueFull};
pub use crate::runtime::{ControlLoop, Decoded, Dispatcher, LoopConfig};
pub use crate::table::{StateTable, TableMachine};
