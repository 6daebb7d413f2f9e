//! Cancellable one-shot timers.

use std::time::Duration;
use tokio::task::JoinHandle;

use crate::resilience::backoff::MIN_DELAY;

/// Handle to a scheduled callback.
///
/// Dropping the handle does not cancel the timer; call [`TimerHandle::cancel`].
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Cancel the timer. A no-op if it already fired.
    pub fn cancel(self) {
        self.task.abort();
    }

    /// True once the callback has run or the timer was cancelled.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Run `callback` once after `delay` on the current tokio runtime.
///
/// Zero delays are raised to 1ms so the callback never runs inline.
pub fn after<F>(delay: Duration, callback: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    // Deadline is fixed now, not when the task is first polled.
    let sleep = tokio::time::sleep(delay.max(MIN_DELAY));
    let task = tokio::spawn(async move {
        sleep.await;
        callback();
    });
    TimerHandle { task }
}
