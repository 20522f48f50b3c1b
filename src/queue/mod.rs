//! Bounded FIFO queue shared between one producer and one consumer thread.
//!
//! Every field of the ring lives behind a single mutex and every wait happens
//! on the one condition variable paired with it. A full queue rejects the
//! item instead of blocking the producer.
//!
//! # Example
//!
//! ```rust
//! use fsmloop::queue::BoundedQueue;
//! use std::sync::Arc;
//! use std::thread;
//! use std::time::Duration;
//!
//! let queue = Arc::new(BoundedQueue::new(10).unwrap());
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         for key in ['u', 'd', 'a'] {
//!             queue.enqueue(key).unwrap();
//!         }
//!     })
//! };
//! producer.join().unwrap();
//!
//! assert_eq!(queue.dequeue_blocking(), 'u');
//! assert_eq!(queue.dequeue_timeout(Duration::from_millis(10)), Some('d'));
//! assert_eq!(queue.dequeue_blocking(), 'a');
//! assert!(queue.is_empty());
//! ```

mod error;

pub use error::{QueueError, QueueFull};

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Fixed-capacity ring buffer. `head` and `tail` advance modulo the capacity.
struct Ring<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Ring<T> {
    fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    fn push(&mut self, item: T) {
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.slots.len();
        self.len += 1;
    }

    fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        item
    }
}

/// Thread-safe bounded FIFO queue.
///
/// Share it between threads with `Arc<BoundedQueue<T>>`.
pub struct BoundedQueue<T> {
    ring: Mutex<Ring<T>>,
    ready: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue holding at most `capacity` items.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }
        Ok(Self {
            ring: Mutex::new(Ring::new(capacity)),
            ready: Condvar::new(),
            capacity,
        })
    }

    /// Append `item` at the tail.
    ///
    /// Fails with `QueueFull` (returning the item) when the queue already
    /// holds `capacity` items. When the queue goes from empty to non-empty,
    /// one waiting consumer is woken.
    pub fn enqueue(&self, item: T) -> Result<(), QueueFull<T>> {
        let mut ring = self.lock();
        if ring.len == self.capacity {
            return Err(QueueFull {
                item,
                capacity: self.capacity,
            });
        }
        let was_empty = ring.len == 0;
        ring.push(item);
        if was_empty {
            self.ready.notify_one();
        }
        Ok(())
    }

    /// Remove the head item, waiting as long as it takes for one to arrive.
    pub fn dequeue_blocking(&self) -> T {
        let mut ring = self.lock();
        loop {
            if let Some(item) = ring.pop() {
                return item;
            }
            ring = match self.ready.wait(ring) {
                Ok(guard) => guard,
                Err(poisoned) => {
                    tracing::warn!("Queue wait observed a poisoned lock, retrying");
                    poisoned.into_inner()
                }
            };
        }
    }

    /// Remove the head item, waiting at most `timeout` for one to arrive.
    ///
    /// Returns `None` once `timeout` has elapsed since the call started
    /// without an item becoming available. Early wake-ups only wait for the
    /// time remaining until that deadline.
    pub fn dequeue_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now().checked_add(timeout);
        let mut ring = self.lock();
        loop {
            if let Some(item) = ring.pop() {
                return Some(item);
            }
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => timeout,
            };
            if remaining.is_zero() {
                return None;
            }
            ring = match self.ready.wait_timeout(ring, remaining) {
                Ok((guard, _)) => guard,
                Err(poisoned) => {
                    tracing::warn!(
                        remaining_ms = remaining.as_millis() as u64,
                        "Timed queue wait failed, retrying"
                    );
                    poisoned.into_inner().0
                }
            };
        }
    }

    /// Snapshot of emptiness; may be stale by the time the caller acts on it.
    pub fn is_empty(&self) -> bool {
        self.lock().len == 0
    }

    /// Snapshot of the number of queued items.
    pub fn len(&self) -> usize {
        self.lock().len
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, Ring<T>> {
        self.ring.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Queue lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
