// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type-erased unit of work.
//!
//! A task captures a callable plus its arguments by value at submission
//! time and is invoked once with no arguments. Ownership moves submitter
//! → queue → executing worker; nothing aliases back.

use std::panic::{self, AssertUnwindSafe};

/// A deferred, fire-and-forget computation. No result is observed by the
/// pool and no identity survives execution.
pub(crate) struct Task {
    f: Box<dyn FnOnce() + Send + 'static>,
}

impl Task {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self { f: Box::new(f) }
    }

    /// Run to completion on the calling thread. A panic is contained
    /// here: the payload is logged and dropped so the worker survives
    /// and the pool never loses a thread to a faulty task.
    pub fn run(self) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(self.f)) {
            log::error!("task panicked: {}", panic_message(&payload));
        }
    }
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}
