// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Bounded injection queue for asynchronously produced envelopes.

This is the single point of concurrent access in the scheduler: any number of
producer threads call [`BoundedInjectionQueue::inject`] while the one loop
thread calls [`BoundedInjectionQueue::try_dequeue`] with a short bounded wait.

ARCHITECTURE:
- Producer threads: push envelopes (non-blocking, just a mutex on the queue)
- Loop thread: consumes at most one envelope per cycle

Overflow is lossy by contract: when full, the single oldest entry is evicted
before the new one is inserted. Producers receive no success/failure signal.
*/

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::envelope::EventEnvelope;

/// Default queue capacity.
pub const DEFAULT_CAPACITY: usize = 10;

struct QueueInner {
    queue: Mutex<VecDeque<EventEnvelope>>,
    available: Condvar,
    capacity: usize,
}

/// Fixed-capacity FIFO with evict-oldest-on-full semantics.
///
/// `Clone` shares the same underlying queue, so a cloned handle can be given
/// to each producer thread.
pub struct BoundedInjectionQueue {
    inner: Arc<QueueInner>,
}

impl BoundedInjectionQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                queue: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
                available: Condvar::new(),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Insert an envelope, evicting the single oldest entry when full.
    ///
    /// Never blocks the caller beyond lock acquisition. Eviction is a
    /// documented, acceptable data-loss mode and is logged at debug only.
    pub fn inject(&self, envelope: EventEnvelope) {
        let mut queue = self.inner.queue.lock().unwrap();
        if queue.len() >= self.inner.capacity {
            if let Some(evicted) = queue.pop_front() {
                debug!(
                    "[INJECT-QUEUE] at capacity {}, evicted oldest envelope from '{}'",
                    self.inner.capacity, evicted.source_id
                );
            }
        }
        queue.push_back(envelope);
        drop(queue);
        self.inner.available.notify_one();
    }

    /// Remove the oldest envelope, waiting up to `timeout` for one to arrive.
    ///
    /// Returns `None` if the queue is still empty when the timeout elapses.
    pub fn try_dequeue(&self, timeout: Duration) -> Option<EventEnvelope> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.inner.queue.lock().unwrap();
        loop {
            if let Some(envelope) = queue.pop_front() {
                return Some(envelope);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, result) = self
                .inner
                .available
                .wait_timeout(queue, deadline - now)
                .unwrap();
            queue = guard;
            if result.timed_out() {
                return queue.pop_front();
            }
        }
    }

    /// Queue size (for monitoring).
    pub fn len(&self) -> usize {
        self.inner.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.queue.lock().unwrap().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }
}

impl Clone for BoundedInjectionQueue {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for BoundedInjectionQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
