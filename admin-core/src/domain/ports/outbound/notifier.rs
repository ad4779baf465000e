use crate::domain::Notification;

/// Outbound port for user-visible notifications (toasts, status lines).
///
/// Delivery is fire-and-forget; controllers never wait on it.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
