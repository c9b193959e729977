//! Notifications

use mockall::automock;
use tracing::{info, warn};

/// Tone of a shopper-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Something went right
    Success,

    /// Something needs the shopper's attention
    Error,
}

/// Shopper-facing toast message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Tone
    pub kind: NotificationKind,

    /// Headline
    pub title: String,

    /// Detail line
    pub message: String,
}

impl Notification {
    /// A success message.
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    /// An error message.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Write-only sink for shopper-facing messages.
#[automock]
pub trait Notifier: Send + Sync {
    /// Show a message. Delivery is best effort.
    fn notify(&self, notification: Notification);
}

/// Notifier that writes messages to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                info!(title = %notification.title, "{}", notification.message);
            }
            NotificationKind::Error => {
                warn!(title = %notification.title, "{}", notification.message);
            }
        }
    }
}
