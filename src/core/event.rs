//! Signals, state ids and events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier naming the kind of an event.
///
/// The valid range is fixed per machine instance: a flat table machine with
/// `signal_count` columns accepts `Signal(0)..Signal(signal_count)` and
/// silently drops everything else.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Signal(pub u16);

impl Signal {
    /// Column index of this signal in a transition matrix.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sig#{}", self.0)
    }
}

/// Identifier of a state in a flat transition table.
///
/// `StateId(state_count)` (or anything above it) is out of range and is used
/// as the "uninitialized" marker before the initial handler runs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct StateId(pub u16);

impl StateId {
    /// Row index of this state in a transition matrix.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state#{}", self.0)
    }
}

/// Payload synthesized by the control loop each time its wait times out.
///
/// `sub_count` runs `0, 1, .., base - 1` and wraps back to 0, so handlers can
/// derive coarser periods (e.g. once per second with a 100 ms tick and base 10).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Tick {
    pub sub_count: u8,
}

/// An event delivered to a machine: a signal plus at most one payload value.
///
/// `P` is usually an enum covering every payload shape the machine knows
/// about, which keeps one active payload per event without erasing types.
///
/// # Example
///
/// ```rust
/// use fsmloop::core::{Event, Signal, Tick};
///
/// let arm: Event<Tick> = Event::new(Signal(2));
/// assert!(arm.payload().is_none());
///
/// let tick = Event::with_payload(Signal(3), Tick { sub_count: 4 });
/// assert_eq!(tick.payload().map(|t| t.sub_count), Some(4));
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Event<P = ()> {
    pub signal: Signal,
    pub payload: Option<P>,
}

impl<P> Event<P> {
    /// Event without payload.
    pub fn new(signal: Signal) -> Self {
        Self {
            signal,
            payload: None,
        }
    }

    /// Event carrying `payload`.
    pub fn with_payload(signal: Signal, payload: P) -> Self {
        Self {
            signal,
            payload: Some(payload),
        }
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }
}
