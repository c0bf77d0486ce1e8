//! User notification boundary
//!
//! The core never renders anything. Every success or failure the user should
//! see goes through [`Notifier::notify`]; the page decides how to show it.

use shared::{Notification, Severity};

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log. Used when the page did not supply a callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => log::error!("[NOTIFY] {}: {}", notification.title, notification.message),
            Severity::Warning => log::warn!("[NOTIFY] {}: {}", notification.title, notification.message),
            Severity::Success | Severity::Info => {
                log::info!("[NOTIFY] {}: {}", notification.title, notification.message)
            }
        }
    }
}
