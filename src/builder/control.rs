//! Builder for control loops.

use crate::builder::error::BuildError;
use crate::core::{Signal, Tick};
use crate::queue::BoundedQueue;
use crate::runtime::{ControlLoop, Decoded, Decoder, Dispatcher, LoopConfig};
use std::sync::Arc;

/// Builder for a `ControlLoop` with a fluent API.
///
/// # Example
///
/// ```rust
/// use fsmloop::core::{Event, Signal, StateId, Tick};
/// use fsmloop::queue::BoundedQueue;
/// use fsmloop::runtime::{ControlLoop, Decoded};
/// use fsmloop::table::{TableBuilder, TableMachine};
/// use std::sync::Arc;
///
/// let table = TableBuilder::<u32, Tick>::new(1, 2)
///     .initial(|me| me.transition(StateId(0)))
///     .on(StateId(0), Signal(1), |me, _| me.data += 1)
///     .build()
///     .unwrap();
/// let machine = TableMachine::new(Arc::new(table), 0);
///
/// let queue = Arc::new(BoundedQueue::new(10).unwrap());
/// queue.enqueue("a").unwrap();
/// queue.enqueue("exit").unwrap();
///
/// let report = ControlLoop::builder(Arc::clone(&queue), machine)
///     .tick_signal(Signal(1))
///     .decoder(|item: &str| match item {
///         "exit" => Decoded::Exit,
///         _ => Decoded::Dispatch(Event::new(Signal(0))),
///     })
///     .build()
///     .unwrap()
///     .run()
///     .unwrap();
///
/// assert_eq!(report.stats.events, 1);
/// ```
pub struct ControlLoopBuilder<D: Dispatcher, T> {
    queue: Arc<BoundedQueue<T>>,
    dispatcher: D,
    config: LoopConfig,
    name: Option<String>,
    tick_signal: Option<Signal>,
    decoder: Option<Decoder<T, D::Payload>>,
}

impl<D, T> ControlLoopBuilder<D, T>
where
    D: Dispatcher,
    D::Payload: From<Tick>,
{
    /// Default thread and log name.
    pub const DEFAULT_NAME: &'static str = "fsm-loop";

    pub fn new(queue: Arc<BoundedQueue<T>>, dispatcher: D) -> Self {
        Self {
            queue,
            dispatcher,
            config: LoopConfig::default(),
            name: None,
            tick_signal: None,
            decoder: None,
        }
    }

    /// Replace the default configuration.
    ///
    /// `queue_capacity` is still validated but does not resize the queue
    /// passed to `new`; create that queue with `LoopConfig::queue` to apply it.
    pub fn config(mut self, config: LoopConfig) -> Self {
        self.config = config;
        self
    }

    /// Thread name, also used in log records.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Signal carried by synthesized tick events (required).
    pub fn tick_signal(mut self, signal: Signal) -> Self {
        self.tick_signal = Some(signal);
        self
    }

    /// Maps queue items to events or the exit sentinel (required).
    pub fn decoder<F>(mut self, decoder: F) -> Self
    where
        F: FnMut(T) -> Decoded<D::Payload> + Send + 'static,
    {
        self.decoder = Some(Box::new(decoder));
        self
    }

    /// Build the loop.
    /// Returns an error if required fields are missing or the configuration
    /// is invalid.
    pub fn build(self) -> Result<ControlLoop<D, T>, BuildError> {
        self.config.validate()?;
        let tick_signal = self.tick_signal.ok_or(BuildError::MissingTickSignal)?;
        let decoder = self.decoder.ok_or(BuildError::MissingDecoder)?;
        let name = self
            .name
            .unwrap_or_else(|| Self::DEFAULT_NAME.to_string());

        Ok(ControlLoop::from_parts(
            name,
            self.config,
            self.queue,
            self.dispatcher,
            decoder,
            tick_signal,
        ))
    }
}
