// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Per-thread worker loop.
//!
//! Priority order: own queue back (LIFO), global queue front (FIFO), then
//! an ordered steal scan over every peer's queue front. A worker exits
//! only after a completely empty sweep that began with the running flag
//! already clear; a partial check could drop a task enqueued concurrently
//! with shutdown. Idle workers park on the pool's condvar instead of
//! spinning.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::pool::Shared;
use crate::task::Task;

/// Park at most this long; bounds staleness if a notify is missed.
const PARK_TIMEOUT: Duration = Duration::from_millis(5);

/// Worker main loop for worker `id`.
pub(crate) fn run(id: usize, shared: &Shared) {
    log::trace!("worker {} up", id);
    loop {
        // Snapshot before sweeping: an entirely empty sweep justifies
        // exit only if shutdown was already requested when it began.
        let running = shared.running.load(Ordering::Acquire);

        if let Some(task) = shared.locals[id].try_pop_back() {
            task.run();
            continue;
        }
        if let Some(task) = shared.global.try_pop_front() {
            task.run();
            continue;
        }
        if let Some(task) = steal(id, shared) {
            task.run();
            continue;
        }
        if !running {
            break;
        }
        park(id, shared);
    }
    log::trace!("worker {} exiting", id);
}

/// Scan every peer in order (id+1, id+2, …) and take the oldest task from
/// the first non-empty queue. Scans all N-1 peers before giving up, so a
/// task sitting only in a distant peer's queue is still found.
fn steal(id: usize, shared: &Shared) -> Option<Task> {
    let n = shared.worker_count;
    for k in 1..n {
        let victim = (id + k) % n;
        if let Some(task) = shared.locals[victim].try_pop_front() {
            return Some(task);
        }
    }
    None
}

/// Wait briefly for a push or shutdown notification.
fn park(id: usize, shared: &Shared) {
    let (lock, cvar) = &shared.work_available;
    let mut ready = lock.lock().unwrap();
    if !shared.running.load(Ordering::Acquire) {
        return;
    }
    // Work may have arrived between the failed sweep and taking the lock.
    if *ready || !shared.global.is_empty() || !shared.locals[id].is_empty() {
        *ready = false;
        return;
    }
    let (mut ready, _timeout) = cvar.wait_timeout(ready, PARK_TIMEOUT).unwrap();
    *ready = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::WorkerPool;
    use crate::queue::WorkDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::{Arc, Condvar, Mutex};
    use std::time::Duration;

    fn bare_shared(n: usize) -> Shared {
        Shared {
            locals: (0..n).map(|_| WorkDeque::new()).collect(),
            global: WorkDeque::new(),
            running: AtomicBool::new(true),
            worker_count: n,
            work_available: (Mutex::new(false), Condvar::new()),
        }
    }

    #[test]
    fn steal_reaches_the_most_distant_peer() {
        let shared = bare_shared(4);
        let hit = Arc::new(AtomicUsize::new(0));
        let h = hit.clone();
        shared.locals[3].push_back(Task::new(move || {
            h.fetch_add(1, Ordering::Relaxed);
        }));
        let task = steal(0, &shared).expect("scan must cover every peer");
        task.run();
        assert_eq!(hit.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn steal_prefers_the_nearest_peer() {
        let shared = bare_shared(4);
        shared.locals[1].push_back(Task::new(|| {}));
        shared.locals[2].push_back(Task::new(|| {}));
        assert!(steal(0, &shared).is_some());
        assert_eq!(shared.locals[1].len(), 0);
        assert_eq!(shared.locals[2].len(), 1);
    }

    #[test]
    fn steal_never_takes_from_own_queue() {
        let shared = bare_shared(3);
        shared.locals[0].push_back(Task::new(|| {}));
        assert!(steal(0, &shared).is_none());
        assert_eq!(shared.locals[0].len(), 1);
    }

    #[test]
    fn single_worker_order_local_lifo_then_global_fifo() {
        // One worker, four pre-start submissions: slots alternate
        // local[0], global. Local drains LIFO first, then global FIFO:
        // expected execution order 2, 0, 1, 3.
        let pool = WorkerPool::with_workers(1);
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..4 {
            let order = order.clone();
            pool.submit(move || {
                order.lock().unwrap().push(i);
            });
        }
        pool.start().unwrap();
        pool.stop();
        assert_eq!(*order.lock().unwrap(), vec![2, 0, 1, 3]);
    }

    #[test]
    fn task_in_distant_peer_queue_is_stolen_while_owner_is_busy() {
        // Five pre-start submissions on a 3-worker pool: slots are
        // local[0], local[1], local[2], global, local[0]. The victim task
        // sits at the front of local[0]; the blocker lands behind it and
        // is popped first (LIFO) by worker 0, which then blocks until the
        // victim has run. Only a peer's steal can reach the victim while
        // worker 0 is blocked; without the full scan this deadlocks.
        let pool = WorkerPool::with_workers(3);
        let (tx, rx) = mpsc::channel::<()>();
        let stolen_in_time = Arc::new(AtomicBool::new(false));

        pool.submit(move || {
            let _ = tx.send(());
        });
        for _ in 0..3 {
            pool.submit(|| {});
        }
        let s = stolen_in_time.clone();
        pool.submit(move || {
            if rx.recv_timeout(Duration::from_secs(5)).is_ok() {
                s.store(true, Ordering::Relaxed);
            }
        });

        pool.start().unwrap();
        pool.stop();
        assert!(
            stolen_in_time.load(Ordering::Relaxed),
            "victim ran concurrently with its blocked owner only via stealing"
        );
    }

    #[test]
    fn workers_terminate_with_empty_queues() {
        // No work at all: every worker must exit within finitely many
        // park cycles once the flag clears.
        let pool = WorkerPool::with_workers(8);
        pool.start().unwrap();
        std::thread::sleep(Duration::from_millis(10));
        pool.stop();
    }
}
