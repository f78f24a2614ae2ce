//! Feed view for the bell badge and the notification popover
//!
//! Read-only projections over one store snapshot. Nothing here mutates the
//! store; clicks go back through [`NotificationStore`] operations.

use crate::error::StoreError;
use crate::store::{count_unread, filter_category, NotificationStore};
use crate::types::{Category, Notification, UnknownCategory};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Popover tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedTab {
    /// Every category
    #[default]
    All,
    /// Market only
    Market,
    /// Farm only
    Farm,
}

impl FeedTab {
    /// Category the tab narrows to, if any
    #[inline]
    #[must_use]
    pub fn category(self) -> Option<Category> {
        match self {
            FeedTab::All => None,
            FeedTab::Market => Some(Category::Market),
            FeedTab::Farm => Some(Category::Farm),
        }
    }

    /// Text shown when the tab has nothing to list
    #[inline]
    #[must_use]
    pub fn empty_message(self) -> &'static str {
        match self {
            FeedTab::All => "No notifications",
            FeedTab::Market => "No market notifications",
            FeedTab::Farm => "No farm notifications",
        }
    }
}

impl From<Category> for FeedTab {
    fn from(category: Category) -> Self {
        match category {
            Category::Market => FeedTab::Market,
            Category::Farm => FeedTab::Farm,
        }
    }
}

impl FromStr for FeedTab {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(FeedTab::All);
        }
        s.parse::<Category>().map(FeedTab::from)
    }
}

impl fmt::Display for FeedTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category() {
            Some(category) => write!(f, "{category}"),
            None => f.write_str("all"),
        }
    }
}

/// Badge text for an unread count; nothing at zero, "9+" past nine
#[must_use]
pub fn badge_label(unread: usize) -> Option<String> {
    match unread {
        0 => None,
        1..=9 => Some(unread.to_string()),
        _ => Some("9+".to_string()),
    }
}

/// Short label for a category chip
#[inline]
#[must_use]
pub fn category_label(category: Category) -> &'static str {
    match category {
        Category::Market => "Market",
        Category::Farm => "Farm",
    }
}

/// Timestamp as shown in the feed, e.g. "Mar 4, 3:07 PM"
#[must_use]
pub fn display_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %-I:%M %p").to_string()
}

/// One feed row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    /// Underlying record
    pub notification: Notification,
    /// Category chip text
    pub label: &'static str,
    /// Formatted creation time
    pub when: String,
    /// Unread dot
    pub unread: bool,
}

impl From<Notification> for FeedItem {
    fn from(notification: Notification) -> Self {
        Self {
            label: category_label(notification.category()),
            when: display_timestamp(notification.timestamp()),
            unread: !notification.is_read(),
            notification,
        }
    }
}

/// Snapshot rendered by the popover
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedView {
    /// Selected tab
    pub tab: FeedTab,
    /// Rows, newest first
    pub items: Vec<FeedItem>,
    /// Unread records across all categories
    pub unread_count: usize,
    /// Badge text
    pub badge: Option<String>,
}

impl FeedView {
    /// Build from one store snapshot
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn build(store: &NotificationStore, tab: FeedTab) -> Result<Self, StoreError> {
        Ok(Self::from_snapshot(&store.notifications()?, tab))
    }

    /// Build from an already sorted list
    #[must_use]
    pub fn from_snapshot(snapshot: &[Notification], tab: FeedTab) -> Self {
        let unread_count = count_unread(snapshot);
        let rows = match tab.category() {
            Some(category) => filter_category(snapshot, category),
            None => snapshot.to_vec(),
        };

        Self {
            tab,
            items: rows.into_iter().map(FeedItem::from).collect(),
            unread_count,
            badge: badge_label(unread_count),
        }
    }

    /// Whether the "Mark all as read" button is shown
    #[inline]
    #[must_use]
    pub fn show_mark_all(&self) -> bool {
        self.unread_count > 0
    }

    /// Empty-state text, if the tab has no rows
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.items.is_empty().then(|| self.tab.empty_message())
    }
}
