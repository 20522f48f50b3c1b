//! Bounded history of recent state transitions.
//!
//! A control loop runs indefinitely, so the history keeps only the most
//! recent `limit` transitions and evicts the oldest ones.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use fsmloop::core::{State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Mode {
///     Setting,
///     Timing,
/// }
///
/// impl State for Mode {
///     fn name(&self) -> &str {
///         match self {
///             Self::Setting => "Setting",
///             Self::Timing => "Timing",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Mode::Setting,
///     to: Mode::Timing,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to.name(), "Timing");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
///
/// # Example
///
/// ```rust
/// use fsmloop::core::{State, StateHistory, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Phase { A, B, C }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::A => "A",
///             Self::B => "B",
///             Self::C => "C",
///         }
///     }
/// }
///
/// let mut history = StateHistory::with_limit(8);
/// history.record(StateTransition { from: Phase::A, to: Phase::B, timestamp: Utc::now() });
/// history.record(StateTransition { from: Phase::B, to: Phase::C, timestamp: Utc::now() });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Phase::A, &Phase::B, &Phase::C]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: VecDeque<StateTransition<S>>,
    limit: usize,
}

impl<S: State> StateHistory<S> {
    /// Default number of retained transitions.
    pub const DEFAULT_LIMIT: usize = 64;

    /// Create an empty history retaining at most `limit` transitions.
    ///
    /// A limit of 0 disables recording.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(Self::DEFAULT_LIMIT)),
            limit,
        }
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.limit == 0 {
            return;
        }
        if self.transitions.len() == self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed by the retained transitions: the first `from`, then
    /// each `to` in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Time between the oldest and newest retained transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }
}
