//! Entry/exit state machine.

use super::{Behavior, Hook, HsmError, Outcome, Trigger};
use crate::core::{Event, State, StateHistory, StateTransition};
use crate::runtime::Dispatcher;
use chrono::Utc;

/// State machine delivering `Entry`/`Exit` around every transition.
pub struct Hsm<B: Behavior> {
    behavior: B,
    current: Option<B::State>,
    history: StateHistory<B::State>,
}

impl<B: Behavior> Hsm<B> {
    /// Create an uninitialized machine with the default history limit.
    pub fn new(behavior: B) -> Self {
        Self::with_history(behavior, StateHistory::default())
    }

    pub(crate) fn with_history(behavior: B, history: StateHistory<B::State>) -> Self {
        Self {
            behavior,
            current: None,
            history,
        }
    }

    /// Run the Init pseudo-event and enter the state it selects.
    pub fn init(&mut self) -> Result<&B::State, HsmError> {
        let target = match self.behavior.initial() {
            Outcome::Transition(target) => target,
            other => {
                return Err(HsmError::InitialMustTransition {
                    outcome: other.kind(),
                })
            }
        };

        let state: &B::State = self.current.insert(target);
        tracing::debug!(state = state.name(), "Machine initialized");
        let entry = self.behavior.handle(state, Trigger::Entry);
        check_hook(Hook::Entry, state, entry)?;

        Ok(state)
    }

    /// Leave the current state and run the Init pseudo-event again.
    ///
    /// The old state gets `Exit` before the switch and the move is recorded
    /// in history. On an uninitialized machine this is `init()`. If the
    /// Init pseudo-event does not transition, the machine is left
    /// uninitialized.
    pub fn reset(&mut self) -> Result<&B::State, HsmError> {
        let Some(source) = self.current.take() else {
            return self.init();
        };
        let exit = self.behavior.handle(&source, Trigger::Exit);

        let target = match self.behavior.initial() {
            Outcome::Transition(target) => target,
            other => {
                return Err(HsmError::InitialMustTransition {
                    outcome: other.kind(),
                })
            }
        };

        let state: &B::State = self.current.insert(target);
        tracing::debug!(from = source.name(), to = state.name(), "Machine reset");
        let entry = self.behavior.handle(state, Trigger::Entry);

        self.history.record(StateTransition {
            from: source.clone(),
            to: state.clone(),
            timestamp: Utc::now(),
        });

        check_hook(Hook::Exit, &source, exit)?;
        check_hook(Hook::Entry, state, entry)?;
        Ok(state)
    }

    /// Deliver `event` to the current state.
    ///
    /// On `Outcome::Transition` the old state's `Exit`, the state switch and
    /// the new state's `Entry` happen in that order before returning.
    pub fn dispatch(&mut self, event: &Event<B::Payload>) -> Result<Outcome<B::State>, HsmError> {
        let source = self.current.clone().ok_or(HsmError::NotInitialized)?;

        let outcome = self.behavior.handle(&source, Trigger::Event(event));
        if let Outcome::Transition(target) = &outcome {
            self.transition(source, target.clone())?;
        }
        Ok(outcome)
    }

    pub fn current(&self) -> Option<&B::State> {
        self.current.as_ref()
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    pub fn history(&self) -> &StateHistory<B::State> {
        &self.history
    }

    pub fn into_behavior(self) -> B {
        self.behavior
    }

    fn transition(&mut self, source: B::State, target: B::State) -> Result<(), HsmError> {
        let exit = self.behavior.handle(&source, Trigger::Exit);

        self.current = Some(target.clone());
        tracing::debug!(
            from = source.name(),
            to = target.name(),
            "State transition"
        );

        let entry = self.behavior.handle(&target, Trigger::Entry);

        self.history.record(StateTransition {
            from: source.clone(),
            to: target.clone(),
            timestamp: Utc::now(),
        });

        check_hook(Hook::Exit, &source, exit)?;
        check_hook(Hook::Entry, &target, entry)
    }
}

fn check_hook<S: State>(hook: Hook, state: &S, outcome: Outcome<S>) -> Result<(), HsmError> {
    match outcome {
        Outcome::Transition(target) => {
            tracing::error!(
                %hook,
                state = state.name(),
                target = target.name(),
                "Transition requested from lifecycle hook was not followed"
            );
            Err(HsmError::TransitionInHook {
                hook,
                state: state.name().to_string(),
                target: target.name().to_string(),
            })
        }
        Outcome::Handled | Outcome::Ignored => Ok(()),
    }
}

impl<B: Behavior> Dispatcher for Hsm<B> {
    type Payload = B::Payload;
    type Error = HsmError;

    fn init(&mut self) -> Result<(), HsmError> {
        Hsm::init(self).map(|_| ())
    }

    fn dispatch(&mut self, event: &Event<B::Payload>) -> Result<(), HsmError> {
        Hsm::dispatch(self, event).map(|_| ())
    }

    fn reset(&mut self) -> Result<(), HsmError> {
        Hsm::reset(self).map(|_| ())
    }

    fn take_tick_resync(&mut self) -> bool {
        self.behavior.take_tick_resync()
    }
}
