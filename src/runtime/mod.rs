//! Consumer side: the control loop and the dispatcher seam it drives.
//!
//! A `ControlLoop` owns the consumer thread. Each iteration waits on the
//! queue for at most one tick interval. A timeout synthesizes a tick event;
//! an item is decoded into an event, dropped, or the exit sentinel that ends
//! the loop. Dispatch failures are logged and never end the loop.

mod config;
mod control;
mod tick;

pub use config::{ConfigError, LoopConfig, RecoveryPolicy};
pub use control::{ControlLoop, Decoder, LoopReport, LoopStats};
pub use tick::TickCounter;

pub use crate::builder::ControlLoopBuilder;

use crate::core::Event;

/// A state machine the control loop can drive.
///
/// Implemented by `table::TableMachine` and `hsm::Hsm`.
pub trait Dispatcher {
    type Payload;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Put the machine into its initial state.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Deliver one event synchronously.
    fn dispatch(&mut self, event: &Event<Self::Payload>) -> Result<(), Self::Error>;

    /// Recover after a failed dispatch. Defaults to `init`.
    fn reset(&mut self) -> Result<(), Self::Error> {
        self.init()
    }

    /// True once after the machine asked for the tick sub-counter to restart.
    fn take_tick_resync(&mut self) -> bool {
        false
    }
}

/// What a queue item means to the control loop.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded<P> {
    /// Dispatch this event
    Dispatch(Event<P>),

    /// Drop the item without dispatching
    Discard,

    /// Leave the loop
    Exit,
}
