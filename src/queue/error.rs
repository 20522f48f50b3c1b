//! Queue errors.

use std::fmt;
use thiserror::Error;

/// Errors raised when constructing a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Queue capacity must be at least 1")]
    ZeroCapacity,
}

/// Returned by `enqueue` when the queue is saturated.
///
/// The rejected item is handed back; it was not queued.
#[derive(PartialEq, Eq, Error)]
#[error("Queue is full (capacity {capacity})")]
pub struct QueueFull<T> {
    pub item: T,
    pub capacity: usize,
}

impl<T> QueueFull<T> {
    pub fn into_inner(self) -> T {
        self.item
    }
}

impl<T> fmt::Debug for QueueFull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueFull")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
