use std::sync::{Arc, Mutex};

use crate::domain::ports::outbound::Notifier;
use crate::domain::Notification;

/// Keeps every notification for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().expect("notifier lock poisoned").clone()
    }

    pub fn failures(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(Notification::is_failure)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().expect("notifier lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .expect("notifier lock poisoned")
            .push(notification);
    }
}

/// Emits notifications as tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_failure() {
            tracing::warn!(title = %notification.title, "{}", notification.description);
        } else {
            tracing::info!(title = %notification.title, "{}", notification.description);
        }
    }
}
