// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Owning facade over a [`WorkerPool`].
//!
//! Starts the pool at construction and stops it on drop, so the pool is
//! drained and joined on every exit path, including unwinding. Exposes
//! only `submit`.

use crate::error::PoolError;
use crate::pool::WorkerPool;

/// Started pool with scoped teardown.
pub struct Dispatcher {
    pool: WorkerPool,
}

impl Dispatcher {
    /// Build and start a pool sized to hardware concurrency.
    pub fn new() -> Result<Self, PoolError> {
        Self::from_pool(WorkerPool::new())
    }

    /// Build and start a pool with an explicit worker count.
    pub fn with_workers(n: usize) -> Result<Self, PoolError> {
        Self::from_pool(WorkerPool::with_workers(n))
    }

    fn from_pool(pool: WorkerPool) -> Result<Self, PoolError> {
        pool.start()?;
        Ok(Self { pool })
    }

    /// Forwarded verbatim to [`WorkerPool::submit`].
    pub fn submit<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pool.submit(f);
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.pool.stop();
    }
}
