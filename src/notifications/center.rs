//! Notification lifecycle.
//!
//! # State Transitions
//! ```text
//! any → Error(msg):   cancel pending dismiss, no new timer
//! any → Success(msg): cancel pending dismiss, schedule dismiss after AUTO_DISMISS
//! any → None:         cancel pending dismiss (clear or timer fired)
//! ```
//!
//! At most one dismiss timer is pending at any time. Each transition bumps an
//! epoch; a timer only clears the notification it was scheduled for.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, watch};

use crate::api::error::MSG_UNEXPECTED;
use crate::notifications::timer::{self, TimerHandle};
use crate::notifications::types::{Notification, NotificationKind};
use crate::observability::metrics;

/// Default auto-dismiss delay for success notifications.
pub const AUTO_DISMISS: Duration = Duration::from_millis(5000);

const EVENT_CAPACITY: usize = 32;

/// Shared notification sink.
///
/// Cheap to clone; all clones drive the same notification. Showing a success
/// notification requires a running tokio runtime.
#[derive(Clone)]
pub struct NotificationCenter {
    shared: Arc<Shared>,
}

struct Shared {
    auto_dismiss: Duration,
    state: Mutex<DismissState>,
    current: watch::Sender<Option<Notification>>,
    events: broadcast::Sender<Notification>,
}

#[derive(Default)]
struct DismissState {
    epoch: u64,
    pending: Option<TimerHandle>,
}

impl NotificationCenter {
    pub fn new(auto_dismiss: Duration) -> Self {
        let (current, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                auto_dismiss,
                state: Mutex::new(DismissState::default()),
                current,
                events,
            }),
        }
    }

    pub fn auto_dismiss(&self) -> Duration {
        self.shared.auto_dismiss
    }

    /// Show an error. Errors stay until replaced or cleared.
    pub fn show_error(&self, message: impl Into<String>) {
        self.show(Notification::error(message));
    }

    /// Show a success message that dismisses itself after the auto-dismiss delay.
    pub fn show_success(&self, message: impl Into<String>) {
        self.show(Notification::success(message));
    }

    /// Remove the current notification, if any.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.epoch += 1;
        if let Some(timer) = state.pending.take() {
            timer.cancel();
        }
        self.shared.current.send_replace(None);
    }

    /// Log an error nothing else handled and tell the user something went wrong.
    pub fn report_unexpected(&self, error: &dyn std::error::Error) {
        tracing::error!(error = %error, "Unexpected error");
        self.show_error(MSG_UNEXPECTED);
    }

    /// The notification on display right now.
    pub fn current(&self) -> Option<Notification> {
        self.shared.current.borrow().clone()
    }

    /// Follow the current notification.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.shared.current.subscribe()
    }

    /// Every notification shown from now on, in order.
    pub fn events(&self) -> broadcast::Receiver<Notification> {
        self.shared.events.subscribe()
    }

    /// True while a dismiss timer is scheduled and has not fired.
    pub fn has_pending_dismiss(&self) -> bool {
        self.lock().pending.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn show(&self, notification: Notification) {
        let mut state = self.lock();
        state.epoch += 1;
        if let Some(timer) = state.pending.take() {
            timer.cancel();
        }

        tracing::debug!(kind = ?notification.kind, message = %notification.message, "Notification shown");
        metrics::record_notification(notification.kind.as_str());

        if notification.kind == NotificationKind::Success {
            let epoch = state.epoch;
            let weak = Arc::downgrade(&self.shared);
            state.pending = Some(timer::after(self.shared.auto_dismiss, move || expire(weak, epoch)));
        }

        let _ = self.shared.events.send(notification.clone());
        self.shared.current.send_replace(Some(notification));
    }

    fn lock(&self) -> MutexGuard<'_, DismissState> {
        self.shared.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(AUTO_DISMISS)
    }
}

fn expire(shared: Weak<Shared>, epoch: u64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let mut state = shared.state.lock().unwrap_or_else(|e| e.into_inner());
    if state.epoch != epoch {
        return;
    }
    state.epoch += 1;
    state.pending = None;
    shared.current.send_replace(None);
    tracing::debug!("Notification auto-dismissed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_auto_dismisses() {
        let center = NotificationCenter::default();
        center.show_success("x");
        assert_eq!(center.current(), Some(Notification::success("x")));

        advance(AUTO_DISMISS).await;
        settle().await;
        assert_eq!(center.current(), None);
        assert!(!center.has_pending_dismiss());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_is_never_dismissed() {
        let center = NotificationCenter::default();
        center.show_error("x");
        assert!(!center.has_pending_dismiss());

        advance(AUTO_DISMISS).await;
        settle().await;
        assert_eq!(center.current(), Some(Notification::error("x")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_cancels_pending_dismiss() {
        let center = NotificationCenter::default();
        center.show_success("a");
        advance(AUTO_DISMISS - Duration::from_millis(1)).await;
        settle().await;

        center.show_error("b");
        advance(AUTO_DISMISS).await;
        settle().await;
        assert_eq!(center.current(), Some(Notification::error("b")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_success_restarts_timer() {
        let center = NotificationCenter::default();
        center.show_success("a");
        advance(Duration::from_millis(3000)).await;
        settle().await;

        center.show_success("b");
        advance(Duration::from_millis(3000)).await;
        settle().await;
        assert_eq!(center.current(), Some(Notification::success("b")));

        advance(Duration::from_millis(2000)).await;
        settle().await;
        assert_eq!(center.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_timer() {
        let center = NotificationCenter::default();
        center.show_success("a");
        center.clear();
        assert_eq!(center.current(), None);
        assert!(!center.has_pending_dismiss());

        center.show_error("b");
        advance(AUTO_DISMISS * 2).await;
        settle().await;
        assert_eq!(center.current(), Some(Notification::error("b")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_record_every_notification() {
        let center = NotificationCenter::new(Duration::from_millis(100));
        let mut events = center.events();
        center.show_success("saved");
        center.show_error("failed");

        assert_eq!(events.recv().await.unwrap(), Notification::success("saved"));
        assert_eq!(events.recv().await.unwrap(), Notification::error("failed"));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_report_unexpected_shows_generic_error() {
        let center = NotificationCenter::default();
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        center.report_unexpected(&err);
        assert_eq!(center.current(), Some(Notification::error(MSG_UNEXPECTED)));
    }
}
