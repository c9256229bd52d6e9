//! Single-slot debounce timer on the Tokio runtime.
//!
//! # Invariants
//! - At most one timer is outstanding; scheduling cancels the previous one.
//! - Once the delay elapses the action runs detached, so a later `cancel`
//!   cannot abort work that has already started.
//! - Tasks run on the runtime handed to `new`, so scheduling works from
//!   threads outside that runtime.

use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub struct DebounceTimer {
    delay: Duration,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime,
            pending: None,
        }
    }

    /// Runs `action` after the quiet period unless rescheduled first.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        let runtime = self.runtime.clone();
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            runtime.spawn(action);
        }));
    }

    /// Cancels the outstanding timer.
    ///
    /// Returns `true` when a timer had not fired yet.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_waiting = !handle.is_finished();
                handle.abort();
                was_waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
