// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Worker pool: queues, threads, submission routing, shutdown.
//!
//! N worker threads each own a local deque; one shared global deque takes
//! every (N+1)-th submission. `stop()` is a graceful drain-then-join:
//! workers keep consuming until local, global, and every peer queue are
//! exhausted.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::PoolError;
use crate::queue::WorkDeque;
use crate::task::Task;
use crate::worker;

/// State shared between the pool handle and its workers.
pub(crate) struct Shared {
    /// Per-worker local queues. Index = worker id.
    pub locals: Vec<WorkDeque<Task>>,
    /// Shared FIFO overflow queue.
    pub global: WorkDeque<Task>,
    /// Cleared once by `stop()`; polled by every worker iteration.
    pub running: AtomicBool,
    /// Number of workers, fixed for the pool's lifetime.
    pub worker_count: usize,
    /// Notifies parked workers that work arrived or shutdown began.
    pub work_available: (Mutex<bool>, Condvar),
}

/// Fixed-size pool of worker threads fed by round-robin fan-out.
///
/// Created idle: queues are allocated eagerly, threads only at `start()`.
/// Tasks submitted before `start()` simply queue.
pub struct WorkerPool {
    shared: Arc<Shared>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    /// Guards against a second `start()`.
    started: AtomicBool,
    /// Incremented per submission; `counter mod (N+1)` picks the queue.
    next_slot: AtomicUsize,
}

impl WorkerPool {
    /// Pool sized to the platform's hardware concurrency, or 4 if that
    /// cannot be determined.
    pub fn new() -> Self {
        let n = thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);
        Self::with_workers(n)
    }

    /// Pool with an explicit worker count (at least 1).
    pub fn with_workers(n: usize) -> Self {
        let worker_count = n.max(1);
        Self {
            shared: Arc::new(Shared {
                locals: (0..worker_count).map(|_| WorkDeque::new()).collect(),
                global: WorkDeque::new(),
                running: AtomicBool::new(false),
                worker_count,
                work_available: (Mutex::new(false), Condvar::new()),
            }),
            handles: Mutex::new(Vec::with_capacity(worker_count)),
            started: AtomicBool::new(false),
            next_slot: AtomicUsize::new(0),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.shared.worker_count
    }

    /// Spawn the worker threads and begin servicing queued work.
    ///
    /// If a spawn fails partway, the pool rolls back to stopped: workers
    /// already running drain what is queued, get joined, and the error is
    /// returned.
    pub fn start(&self) -> Result<(), PoolError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(PoolError::AlreadyStarted);
        }
        self.shared.running.store(true, Ordering::Release);

        let mut handles = self.handles.lock().unwrap();
        for id in 0..self.shared.worker_count {
            let shared = self.shared.clone();
            let spawned = thread::Builder::new()
                .name(format!("workpile-worker-{}", id))
                .spawn(move || worker::run(id, &shared));
            match spawned {
                Ok(h) => handles.push(h),
                Err(e) => {
                    self.shared.running.store(false, Ordering::Release);
                    self.notify_all();
                    for h in handles.drain(..) {
                        let _ = h.join();
                    }
                    return Err(PoolError::Spawn(e));
                }
            }
        }
        log::trace!("started {} workers", self.shared.worker_count);
        Ok(())
    }

    /// Bind `f` into a task and route it: submission counter c, modulo
    /// N+1; slot N is the global queue, slots 0..N the local queues. The
    /// global queue gets the same long-run share as any single local
    /// queue, keeping a fraction of work queue-agnostic to fuel stealing.
    ///
    /// Returns immediately; there is no result handle.
    pub fn submit<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let slot = self.next_slot.fetch_add(1, Ordering::Relaxed) % (self.shared.worker_count + 1);
        let task = Task::new(f);
        if slot == self.shared.worker_count {
            self.shared.global.push_back(task);
        } else {
            self.shared.locals[slot].push_back(task);
        }
        self.notify_one();
    }

    /// Signal shutdown and block until every worker has exited. Queued
    /// and in-flight tasks all run first; this never aborts work.
    /// Idempotent: a second call joins nothing and returns.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::Release);
        self.notify_all();
        let mut handles = self.handles.lock().unwrap();
        for h in handles.drain(..) {
            let _ = h.join();
        }
        log::trace!("all workers joined");
    }

    fn notify_one(&self) {
        let (lock, cvar) = &self.shared.work_available;
        let mut ready = lock.lock().unwrap();
        *ready = true;
        cvar.notify_one();
    }

    fn notify_all(&self) {
        let (lock, cvar) = &self.shared.work_available;
        let mut ready = lock.lock().unwrap();
        *ready = true;
        cvar.notify_all();
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.shared.running.load(Ordering::Acquire) {
            self.stop();
        }
    }
}
