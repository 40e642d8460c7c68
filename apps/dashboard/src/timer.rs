//! Timers owned by whoever schedules them.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A delayed task that is aborted when rescheduled, cancelled or dropped.
#[derive(Debug, Default)]
pub struct ScopedTimer {
    handle: Option<JoinHandle<()>>,
}

impl ScopedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` after `delay`, replacing any pending task.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
