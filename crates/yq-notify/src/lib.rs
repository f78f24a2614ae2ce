//! YieldQuip Notifications
//!
//! App-lifetime notification store for the farm dashboard:
//! - Market and farm notifications with read/unread tracking
//! - Newest-first feed with per-category tabs
//! - A toast for every new notification
//! - A simulated feed that adds one notification every few minutes
//!
//! # Example
//!
//! ```rust,ignore
//! use yq_notify::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), StoreError> {
//! let store = NotificationStore::create(
//!     &StoreConfig::new(),
//!     seed_notifications(chrono::Utc::now()),
//!     Arc::new(TracingToaster),
//! )?;
//!
//! store.add_notification(NotificationDraft::farm("New farming quest added: Till north field"))?;
//! println!("{} unread", store.unread_count()?);
//!
//! store.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod generator;
pub mod store;
pub mod toast;
pub mod types;
pub mod view;

pub use config::StoreConfig;
pub use error::{ConfigError, StoreError};
pub use generator::{compose_message, generate_draft, random_category, GeneratorTicket};
pub use store::{Lifecycle, NotificationStore, StoreEvent};
pub use toast::{NoopToaster, Toast, Toaster, TracingToaster};
pub use types::{
    seed_notifications, Category, Notification, NotificationAction, NotificationDraft,
    NotificationId,
};
pub use view::{badge_label, FeedItem, FeedTab, FeedView};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the notification store
    pub use crate::{
        seed_notifications, Category, FeedTab, FeedView, Notification, NotificationDraft,
        NotificationId, NotificationStore, StoreConfig, StoreError, StoreEvent, Toast, Toaster,
        TracingToaster,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
