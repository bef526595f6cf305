use crate::error::{PipelineError, Result};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;

/// A fixed-capacity FIFO handoff channel with blocking `put` and `get`.
///
/// One cloned handle lives on the producer side and one on the consumer
/// side. `put` blocks while the buffer is full and `get` blocks while it
/// is empty, so a slow consumer throttles its producer to at most
/// `capacity` in-flight items (backpressure). Items are never dropped,
/// duplicated, or reordered.
#[derive(Debug)]
pub struct BoundedBuffer<T: Send> {
    inner: Arc<Inner<T>>,
}

#[derive(Debug)]
struct Inner<T> {
    queue: Mutex<VecDeque<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T: Send> Clone for BoundedBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send> BoundedBuffer<T> {
    /// Create a new buffer holding at most `capacity` items.
    ///
    /// Returns [`PipelineError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(PipelineError::InvalidCapacity);
        }
        Ok(Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::with_capacity(capacity)),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
                capacity,
            }),
        })
    }

    /// Enqueue an item, blocking until a slot is free.
    ///
    /// There is no timeout: a stalled consumer stalls the producer
    /// indefinitely. Wakes at most one blocked `get`.
    pub fn put(&self, item: T) {
        let mut queue = self.inner.queue.lock();
        // The condvar releases the lock while waiting; the lock is only
        // ever held for the O(1) queue operation itself.
        while queue.len() == self.inner.capacity {
            self.inner.not_full.wait(&mut queue);
        }
        queue.push_back(item);
        drop(queue);
        self.inner.not_empty.notify_one();
    }

    /// Dequeue the oldest item, blocking until one is available.
    ///
    /// Wakes at most one blocked `put`. Ownership of the item transfers
    /// to the caller.
    pub fn get(&self) -> T {
        let mut queue = self.inner.queue.lock();
        loop {
            if let Some(item) = queue.pop_front() {
                drop(queue);
                self.inner.not_full.notify_one();
                return item;
            }
            self.inner.not_empty.wait(&mut queue);
        }
    }

    /// Number of items currently queued
    pub fn len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.inner.queue.lock().is_empty()
    }

    /// The fixed capacity this buffer was built with
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }
}
