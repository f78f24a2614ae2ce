//! Toast sink
//!
//! Every created notification raises exactly one transient alert. The store
//! only knows the [`Toaster`] trait; the composition root picks the sink.

use crate::types::{Category, Notification};

/// Transient user-facing alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Heading
    pub title: String,
    /// Body text
    pub description: String,
    /// Category of the notification that raised it
    pub category: Category,
}

impl Toast {
    /// Toast announcing a new notification
    #[must_use]
    pub fn for_notification(notification: &Notification) -> Self {
        Self {
            title: title_for(notification.category()).to_string(),
            description: notification.message().to_string(),
            category: notification.category(),
        }
    }
}

/// Toast heading per category
#[inline]
#[must_use]
pub fn title_for(category: Category) -> &'static str {
    match category {
        Category::Market => "Market Update",
        Category::Farm => "Farm Alert",
    }
}

/// Fire-and-forget toast display
pub trait Toaster: Send + Sync {
    /// Show a toast. Must not block.
    fn toast(&self, toast: Toast);
}

/// Emits toasts as `info` events on the `toast` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingToaster;

impl Toaster for TracingToaster {
    fn toast(&self, toast: Toast) {
        tracing::info!(
            target: "toast",
            category = %toast.category,
            "{}: {}",
            toast.title,
            toast.description
        );
    }
}

/// Discards toasts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopToaster;

impl Toaster for NoopToaster {
    fn toast(&self, _toast: Toast) {}
}
