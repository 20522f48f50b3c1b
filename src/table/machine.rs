//! Table machine: current state, handler context and a shared matrix.

use super::{Instance, StateTable, TableError};
use crate::core::{Event, Signal, StateId};
use crate::runtime::Dispatcher;
use std::sync::Arc;

/// Result of dispatching one event to a `TableMachine`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// Signal outside the table; no handler ran
    Ignored(Signal),

    /// Handler ran and left the state unchanged
    Stayed(StateId),

    /// Handler moved the machine to another state
    Transitioned { from: StateId, to: StateId },
}

/// Flat state machine driven by a `StateTable`.
///
/// Mutated only by the thread that owns it; the table itself is immutable and
/// may be shared between machines.
pub struct TableMachine<C, P> {
    table: Arc<StateTable<C, P>>,
    instance: Instance<C>,
}

impl<C, P> TableMachine<C, P> {
    /// Bind `table` and the handler context. The machine starts
    /// uninitialized; call `init()` before dispatching.
    pub fn new(table: Arc<StateTable<C, P>>, data: C) -> Self {
        let uninitialized = StateId(table.state_count);
        Self {
            table,
            instance: Instance::new(uninitialized, data),
        }
    }

    /// Reset to the uninitialized marker and run the initial handler.
    ///
    /// Fails when the initial handler did not select a valid state.
    pub fn init(&mut self) -> Result<StateId, TableError> {
        self.instance.set_state(StateId(self.table.state_count));
        (self.table.initial)(&mut self.instance);
        let state = self.check_state()?;
        tracing::debug!(state = %state, "Table machine initialized");
        Ok(state)
    }

    /// Deliver `event` to the handler in the current state's row.
    ///
    /// Signals beyond the table width are dropped silently. A handler leaving
    /// the machine outside the valid state range is reported as
    /// `TableError::InvalidState`; further dispatches keep failing the same
    /// way until `init()` is called again.
    pub fn dispatch(&mut self, event: &Event<P>) -> Result<StepResult, TableError> {
        if !self.table.contains_signal(event.signal) {
            return Ok(StepResult::Ignored(event.signal));
        }

        let from = self.check_state()?;
        let handler = self.table.handler(from, event.signal);
        handler(&mut self.instance, event);

        let to = self.check_state().inspect_err(|err| {
            tracing::error!(
                %err,
                from = %from,
                signal = %event.signal,
                "Handler left machine in invalid state"
            );
        })?;

        if from == to {
            Ok(StepResult::Stayed(to))
        } else {
            tracing::debug!(from = %from, to = %to, signal = %event.signal, "Table transition");
            Ok(StepResult::Transitioned { from, to })
        }
    }

    pub fn current(&self) -> StateId {
        self.instance.state()
    }

    /// True when the current state is outside the table (never initialized,
    /// or broken by a handler).
    pub fn is_corrupted(&self) -> bool {
        !self.table.contains_state(self.instance.state())
    }

    pub fn data(&self) -> &C {
        &self.instance.data
    }

    pub fn data_mut(&mut self) -> &mut C {
        &mut self.instance.data
    }

    pub fn table(&self) -> &Arc<StateTable<C, P>> {
        &self.table
    }

    pub fn into_data(self) -> C {
        self.instance.data
    }

    fn check_state(&self) -> Result<StateId, TableError> {
        let state = self.instance.state();
        if self.table.contains_state(state) {
            Ok(state)
        } else {
            Err(TableError::InvalidState {
                state,
                state_count: self.table.state_count,
            })
        }
    }
}

impl<C, P> Dispatcher for TableMachine<C, P> {
    type Payload = P;
    type Error = TableError;

    fn init(&mut self) -> Result<(), TableError> {
        TableMachine::init(self).map(|_| ())
    }

    fn dispatch(&mut self, event: &Event<P>) -> Result<(), TableError> {
        TableMachine::dispatch(self, event).map(|_| ())
    }

    fn take_tick_resync(&mut self) -> bool {
        self.instance.take_tick_resync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SETTING: StateId = StateId(0);
    const TIMING: StateId = StateId(1);
    const UP: Signal = Signal(0);
    const ARM: Signal = Signal(2);
    const TICK: Signal = Signal(3);

    #[derive(Debug, Default)]
    struct Bomb {
        timeout: u32,
        armed_count: u32,
    }

    fn bomb_table() -> Arc<StateTable<Bomb, ()>> {
        let table = TableBuilder::new(2, 4)
            .initial(|me: &mut Instance<Bomb>| {
                me.data.timeout = 15;
                me.transition(SETTING);
            })
            .on(SETTING, UP, |me, _| me.data.timeout += 1)
            .on(SETTING, ARM, |me, _| {
                me.data.armed_count += 1;
                me.transition(TIMING);
            })
            .on(TIMING, ARM, |me, _| me.transition(SETTING))
            .on(TIMING, TICK, |me, _| me.data.timeout -= 1)
            .build()
            .unwrap();
        Arc::new(table)
    }

    #[test]
    fn new_machine_is_uninitialized() {
        let machine = TableMachine::new(bomb_table(), Bomb::default());
        assert!(machine.is_corrupted());
        assert_eq!(machine.current(), StateId(2));
    }

    #[test]
    fn init_runs_initial_handler() {
        let mut machine = TableMachine::new(bomb_table(), Bomb::default());
        assert_eq!(machine.init().unwrap(), SETTING);
        assert_eq!(machine.data().timeout, 15);
        assert!(!machine.is_corrupted());
    }

    #[test]
    fn in_state_action_keeps_state() {
        let mut machine = TableMachine::new(bomb_table(), Bomb::default());
        machine.init().unwrap();

        let step = machine.dispatch(&Event::new(UP)).unwrap();
        assert_eq!(step, StepResult::Stayed(SETTING));
        assert_eq!(machine.data().timeout, 16);
    }

    #[test]
    fn handler_transition_changes_state() {
        let mut machine = TableMachine::new(bomb_table(), Bomb::default());
        machine.init().unwrap();

        let step = machine.dispatch(&Event::new(ARM)).unwrap();
        assert_eq!(
            step,
            StepResult::Transitioned {
                from: SETTING,
                to: TIMING
            }
        );
        assert_eq!(machine.current(), TIMING);
        assert_eq!(machine.data().armed_count, 1);
    }

    #[test]
    fn empty_cell_is_noop() {
        let mut machine = TableMachine::new(bomb_table(), Bomb::default());
        machine.init().unwrap();

        let step = machine.dispatch(&Event::new(TICK)).unwrap();
        assert_eq!(step, StepResult::Stayed(SETTING));
        assert_eq!(machine.data().timeout, 15);
    }

    #[test]
    fn out_of_range_signal_is_ignored() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let table = TableBuilder::<(), ()>::new(1, 2)
            .initial(|me| me.transition(StateId(0)))
            .on(StateId(0), Signal(0), move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();
        let mut machine = TableMachine::new(Arc::new(table), ());
        machine.init().unwrap();

        let step = machine.dispatch(&Event::new(Signal(7))).unwrap();
        assert_eq!(step, StepResult::Ignored(Signal(7)));
        assert_eq!(machine.current(), StateId(0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn invalid_state_after_dispatch_is_reported() {
        let table = TableBuilder::<(), ()>::new(2, 1)
            .initial(|me| me.transition(StateId(0)))
            .on(StateId(0), Signal(0), |me, _| me.transition(StateId(9)))
            .build()
            .unwrap();
        let mut machine = TableMachine::new(Arc::new(table), ());
        machine.init().unwrap();

        let err = machine.dispatch(&Event::new(Signal(0))).unwrap_err();
        assert_eq!(
            err,
            TableError::InvalidState {
                state: StateId(9),
                state_count: 2
            }
        );
        assert!(machine.is_corrupted());

        // Corrupted machines refuse to index the table until reset.
        assert!(machine.dispatch(&Event::new(Signal(0))).is_err());
        assert_eq!(machine.init().unwrap(), StateId(0));
        assert!(!machine.is_corrupted());
    }

    #[test]
    fn initial_handler_must_select_state() {
        let table = TableBuilder::<(), ()>::new(2, 1)
            .initial(|_| {})
            .build()
            .unwrap();
        let mut machine = TableMachine::new(Arc::new(table), ());

        assert!(matches!(
            machine.init(),
            Err(TableError::InvalidState { state: StateId(2), .. })
        ));
    }

    #[test]
    fn dispatch_before_init_fails() {
        let mut machine = TableMachine::new(bomb_table(), Bomb::default());
        assert!(machine.dispatch(&Event::new(UP)).is_err());
    }

    #[test]
    fn resync_request_flows_to_dispatcher() {
        let table = TableBuilder::<(), ()>::new(1, 1)
            .initial(|me| me.transition(StateId(0)))
            .on(StateId(0), Signal(0), |me, _| me.resync_ticks())
            .build()
            .unwrap();
        let mut machine = TableMachine::new(Arc::new(table), ());
        Dispatcher::init(&mut machine).unwrap();

        assert!(!machine.take_tick_resync());
        Dispatcher::dispatch(&mut machine, &Event::new(Signal(0))).unwrap();
        assert!(machine.take_tick_resync());
        assert!(!machine.take_tick_resync());
    }
}
