use std::io::IsTerminal;
use std::sync::Arc;

use admin_core::adapters::TracingNotifier;
use admin_core::{Notification, Notifier};

/// Toasts go to the terminal when there is one, otherwise into the log.
pub fn notifier() -> Arc<dyn Notifier> {
    if std::io::stdout().is_terminal() {
        Arc::new(ConsoleNotifier)
    } else {
        Arc::new(TracingNotifier)
    }
}

/// Prints notifications as they are raised.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_failure() {
            eprintln!("✗ {}: {}", notification.title, notification.description);
        } else {
            println!("✓ {}: {}", notification.title, notification.description);
        }
    }
}
