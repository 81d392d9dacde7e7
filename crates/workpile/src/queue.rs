// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Thread-safe double-ended task buffer.
//!
//! One instance per worker plus one global instance. Owners drain their
//! own queue from the back (LIFO, cache-hot), stealers and global
//! consumers take from the front (FIFO, fair to older work).

use std::collections::VecDeque;
use std::sync::Mutex;

/// Mutex-protected VecDeque. Every operation is try-style and holds the
/// lock for a bounded critical section; nothing here parks a caller.
///
/// Unbounded; `push_back` always succeeds. Contention is scoped to the
/// single queue: no lock is shared between instances.
pub(crate) struct WorkDeque<T> {
    inner: Mutex<VecDeque<T>>,
}

impl<T> WorkDeque<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Append to the tail.
    pub fn push_back(&self, item: T) {
        self.inner.lock().unwrap().push_back(item);
    }

    /// Remove the head if non-empty. FIFO path: global queue and steals.
    pub fn try_pop_front(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Remove the tail if non-empty. LIFO path: a worker draining its own
    /// queue, favoring the most recently submitted work.
    pub fn try_pop_back(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_back()
    }

    /// Emptiness hint. Stale the moment the lock is released; never the
    /// sole basis for a correctness decision.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}
