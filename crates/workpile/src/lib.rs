// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! In-process work-stealing task pool.
//!
//! Fire-and-forget execution over a fixed set of OS worker threads. Each
//! worker owns a local deque (LIFO for the owner, FIFO for stealers);
//! submissions fan out round-robin across the N local queues plus one
//! shared global FIFO. Idle workers steal from peers instead of spinning.
//!
//! Components:
//! - `WorkDeque` — mutex-guarded double-ended task buffer
//! - `WorkerPool` — queues, threads, submission routing, drain-then-join stop
//! - `Dispatcher` — owning facade: starts on construction, stops on drop
//!
//! No result channel, no cancellation, no priorities: a submitted task
//! runs exactly once on some worker, and `stop()` returns only after every
//! queued task has run.
//!
//! ```
//! use workpile::Dispatcher;
//!
//! let dispatcher = Dispatcher::new().unwrap();
//! dispatcher.submit(|| {
//!     // runs on a worker thread
//! });
//! // dropping the dispatcher drains and joins the pool
//! ```

mod queue;
mod task;
mod worker;

pub mod dispatcher;
pub mod error;
pub mod pool;

pub use dispatcher::Dispatcher;
pub use error::PoolError;
pub use pool::WorkerPool;
