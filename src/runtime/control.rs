//! Control loop: timed waits, tick synthesis and dispatch.

use super::{Decoded, Dispatcher, LoopConfig, RecoveryPolicy, TickCounter};
use crate::builder::ControlLoopBuilder;
use crate::core::{Event, Signal, Tick};
use crate::queue::BoundedQueue;
use serde::Serialize;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use uuid::Uuid;

/// Maps an opaque queue item to what the loop should do with it.
pub type Decoder<T, P> = Box<dyn FnMut(T) -> Decoded<P> + Send>;

/// Counters collected while the loop runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    /// Decoded input events dispatched
    pub events: u64,
    /// Tick events synthesized and dispatched
    pub ticks: u64,
    /// Items the decoder discarded
    pub discarded: u64,
    /// Dispatches that reported an error
    pub failures: u64,
    /// Successful resets after a failure
    pub resets: u64,
}

/// Returned when the loop exits: the dispatcher plus its counters.
#[derive(Debug)]
pub struct LoopReport<D> {
    pub dispatcher: D,
    pub stats: LoopStats,
}

/// Consumer loop feeding one dispatcher from one queue.
pub struct ControlLoop<D: Dispatcher, T> {
    id: Uuid,
    name: String,
    config: LoopConfig,
    queue: Arc<BoundedQueue<T>>,
    dispatcher: D,
    decoder: Decoder<T, D::Payload>,
    tick_signal: Signal,
    ticks: TickCounter,
    stats: LoopStats,
}

impl<D, T> ControlLoop<D, T>
where
    D: Dispatcher,
    D::Payload: From<Tick>,
{
    /// Start configuring a loop that reads `queue` and drives `dispatcher`.
    pub fn builder(queue: Arc<BoundedQueue<T>>, dispatcher: D) -> ControlLoopBuilder<D, T> {
        ControlLoopBuilder::new(queue, dispatcher)
    }

    pub(crate) fn from_parts(
        name: String,
        config: LoopConfig,
        queue: Arc<BoundedQueue<T>>,
        dispatcher: D,
        decoder: Decoder<T, D::Payload>,
        tick_signal: Signal,
    ) -> Self {
        let ticks = TickCounter::new(config.tick_base);
        Self {
            id: Uuid::new_v4(),
            name,
            config,
            queue,
            dispatcher,
            decoder,
            tick_signal,
            ticks,
            stats: LoopStats::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Initialize the dispatcher and run on the current thread until the
    /// decoder yields `Decoded::Exit`.
    ///
    /// Only initialization can fail; errors from individual dispatches are
    /// logged and handled per `RecoveryPolicy`.
    pub fn run(mut self) -> Result<LoopReport<D>, D::Error> {
        self.dispatcher.init()?;
        tracing::info!(
            loop_id = %self.id,
            name = %self.name,
            tick_ms = self.config.tick_interval.as_millis() as u64,
            "Control loop started"
        );

        loop {
            match self.queue.dequeue_timeout(self.config.tick_interval) {
                None => self.tick(),
                Some(item) => match (self.decoder)(item) {
                    Decoded::Dispatch(event) => {
                        self.stats.events += 1;
                        self.deliver(&event);
                    }
                    Decoded::Discard => self.stats.discarded += 1,
                    Decoded::Exit => break,
                },
            }
        }

        tracing::info!(
            loop_id = %self.id,
            events = self.stats.events,
            ticks = self.stats.ticks,
            failures = self.stats.failures,
            "Control loop stopped"
        );
        Ok(LoopReport {
            dispatcher: self.dispatcher,
            stats: self.stats,
        })
    }

    /// Run the loop on a dedicated thread named after the loop.
    pub fn spawn(self) -> io::Result<JoinHandle<Result<LoopReport<D>, D::Error>>>
    where
        D: Send + 'static,
        D::Payload: 'static,
        T: Send + 'static,
    {
        thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || self.run())
    }

    fn tick(&mut self) {
        if self.dispatcher.take_tick_resync() {
            tracing::debug!(loop_id = %self.id, "Tick sub-counter resynchronized");
            self.ticks.resync();
        }
        let event = Event::with_payload(self.tick_signal, D::Payload::from(self.ticks.next_tick()));
        self.stats.ticks += 1;
        self.deliver(&event);
    }

    fn deliver(&mut self, event: &Event<D::Payload>) {
        let Err(err) = self.dispatcher.dispatch(event) else {
            return;
        };
        self.stats.failures += 1;
        tracing::warn!(
            loop_id = %self.id,
            %err,
            signal = %event.signal,
            "Dispatch failed, loop continues"
        );

        if self.config.recovery == RecoveryPolicy::Reset {
            match self.dispatcher.reset() {
                Ok(()) => {
                    self.stats.resets += 1;
                    self.ticks.resync();
                    tracing::info!(loop_id = %self.id, "Dispatcher reset after failure");
                }
                Err(err) => {
                    tracing::error!(loop_id = %self.id, %err, "Dispatcher reset failed");
                }
            }
        }
    }
}
