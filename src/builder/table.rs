//! Builder for flat transition tables.

use crate::builder::error::BuildError;
use crate::core::{Event, Signal, StateId};
use crate::table::{Handler, InitialHandler, Instance, StateTable};

/// Builder for a `StateTable` with a fluent API.
///
/// Cells that are never configured hold `StateTable::empty`. Configuring the
/// same cell twice keeps the last handler.
pub struct TableBuilder<C, P> {
    state_count: u16,
    signal_count: u16,
    cells: Vec<Option<Handler<C, P>>>,
    initial: Option<InitialHandler<C>>,
    misplaced: Option<(StateId, Signal)>,
}

impl<C: 'static, P: 'static> TableBuilder<C, P> {
    /// Create a builder for a `state_count × signal_count` matrix.
    pub fn new(state_count: u16, signal_count: u16) -> Self {
        let size = usize::from(state_count) * usize::from(signal_count);
        Self {
            state_count,
            signal_count,
            cells: (0..size).map(|_| None).collect(),
            initial: None,
            misplaced: None,
        }
    }

    /// Set the initial-state callback (required).
    pub fn initial<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Instance<C>) + Send + Sync + 'static,
    {
        self.initial = Some(Box::new(handler));
        self
    }

    /// Set the handler for `signal` while in `state`.
    pub fn on<F>(mut self, state: StateId, signal: Signal, handler: F) -> Self
    where
        F: Fn(&mut Instance<C>, &Event<P>) + Send + Sync + 'static,
    {
        if state.0 >= self.state_count || signal.0 >= self.signal_count {
            self.misplaced.get_or_insert((state, signal));
            return self;
        }
        let index = state.index() * usize::from(self.signal_count) + signal.index();
        self.cells[index] = Some(Box::new(handler));
        self
    }

    /// Build the table.
    /// Returns an error if required fields are missing or a cell was placed
    /// outside the matrix.
    pub fn build(self) -> Result<StateTable<C, P>, BuildError> {
        if self.state_count == 0 || self.signal_count == 0 {
            return Err(BuildError::EmptyTable {
                states: self.state_count,
                signals: self.signal_count,
            });
        }
        if let Some((state, signal)) = self.misplaced {
            return Err(BuildError::CellOutOfRange {
                state,
                signal,
                states: self.state_count,
                signals: self.signal_count,
            });
        }
        let initial = self.initial.ok_or(BuildError::MissingInitialHandler)?;

        let cells = self
            .cells
            .into_iter()
            .map(|cell| cell.unwrap_or_else(noop::<C, P>))
            .collect();

        Ok(StateTable {
            cells,
            initial,
            state_count: self.state_count,
            signal_count: self.signal_count,
        })
    }
}

fn noop<C: 'static, P: 'static>() -> Handler<C, P> {
    Box::new(StateTable::<C, P>::empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_validates_required_fields() {
        let result = TableBuilder::<(), ()>::new(2, 4).build();
        assert!(matches!(result, Err(BuildError::MissingInitialHandler)));
    }

    #[test]
    fn builder_rejects_empty_dimensions() {
        let result = TableBuilder::<(), ()>::new(0, 4)
            .initial(|_| {})
            .build();
        assert!(matches!(
            result,
            Err(BuildError::EmptyTable {
                states: 0,
                signals: 4
            })
        ));
    }

    #[test]
    fn builder_rejects_cell_outside_matrix() {
        let result = TableBuilder::<(), ()>::new(2, 4)
            .initial(|me| me.transition(StateId(0)))
            .on(StateId(1), Signal(4), |_, _| {})
            .build();

        assert!(matches!(
            result,
            Err(BuildError::CellOutOfRange {
                state: StateId(1),
                signal: Signal(4),
                ..
            })
        ));
    }

    #[test]
    fn fluent_api_builds_full_matrix() {
        let table = TableBuilder::<u8, ()>::new(2, 4)
            .initial(|me| me.transition(StateId(0)))
            .on(StateId(0), Signal(2), |me, _| me.transition(StateId(1)))
            .build()
            .unwrap();

        assert_eq!(table.cells.len(), 8);
        assert_eq!(table.state_count(), 2);
        assert_eq!(table.signal_count(), 4);
    }
}
