// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pool lifecycle errors.

use thiserror::Error;

/// Error starting a pool. Submission and shutdown do not fail; every
/// other failure surface belongs to caller-supplied task bodies.
#[derive(Debug, Error)]
pub enum PoolError {
    /// `start()` was called a second time on the same pool.
    #[error("pool already started")]
    AlreadyStarted,

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}
