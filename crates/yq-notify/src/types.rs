//! Core types for notifications
//!
//! Defines the record model shared by the store, the generator and the feed:
//! - Notification ids and categories
//! - Notification records and their optional action
//! - Drafts (the caller-supplied part of a record)
//! - The startup seed fixture

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Unique notification identifier
///
/// New records get a ULID (time-ordered); seeded records keep whatever token
/// the fixture assigns them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    /// Generate new notification ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Borrow the raw token
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for NotificationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NotificationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Notification category, used for feed filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Commodity prices and marketplace activity
    Market,
    /// Field, weather and equipment advisories
    Farm,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 2] = [Category::Market, Category::Farm];

    /// Lowercase tag
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Market => "market",
            Category::Farm => "farm",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognised category tags
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "market" => Ok(Category::Market),
            "farm" => Ok(Category::Farm),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Advisory navigation hint attached to a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    /// Button label
    pub label: String,
    /// Navigation target
    pub url: String,
}

impl NotificationAction {
    /// Create new action
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// A single notification record
///
/// Everything except the read flag is fixed at creation. Consumers only ever
/// hold copies; the flag on the live record is changed through the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    message: String,
    category: Category,
    timestamp: DateTime<Utc>,
    read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<NotificationAction>,
}

impl Notification {
    /// Build a fresh, unread record from a draft
    #[must_use]
    pub fn from_draft(draft: NotificationDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: NotificationId::new(),
            message: draft.message,
            category: draft.category,
            timestamp,
            read: false,
            action: draft.action,
        }
    }

    /// Build a record with every field given (fixtures, imports)
    #[must_use]
    pub fn with_fields(
        id: impl Into<NotificationId>,
        category: Category,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
        read: bool,
        action: Option<NotificationAction>,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            category,
            timestamp,
            read,
            action,
        }
    }

    /// Record id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    /// Message text
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Category tag
    #[inline]
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Creation instant
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether the record has been read
    #[inline]
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.read
    }

    /// Optional navigation hint
    #[inline]
    #[must_use]
    pub fn action(&self) -> Option<&NotificationAction> {
        self.action.as_ref()
    }

    /// Flip to read. Returns true if the flag changed.
    pub(crate) fn mark_read(&mut self) -> bool {
        let changed = !self.read;
        self.read = true;
        changed
    }
}

/// Caller-supplied part of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    /// Category tag
    pub category: Category,
    /// Message text
    pub message: String,
    /// Optional navigation hint
    pub action: Option<NotificationAction>,
}

impl NotificationDraft {
    /// Create new draft
    #[inline]
    #[must_use]
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            action: None,
        }
    }

    /// Market draft
    #[inline]
    #[must_use]
    pub fn market(message: impl Into<String>) -> Self {
        Self::new(Category::Market, message)
    }

    /// Farm draft
    #[inline]
    #[must_use]
    pub fn farm(message: impl Into<String>) -> Self {
        Self::new(Category::Farm, message)
    }

    /// With action
    #[inline]
    #[must_use]
    pub fn with_action(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.action = Some(NotificationAction::new(label, url));
        self
    }
}

/// Startup fixture: five records aged relative to `now`, three of them unread
#[must_use]
pub fn seed_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    vec![
        Notification::with_fields(
            "1",
            Category::Market,
            "Corn prices have increased by 5% today",
            now - Duration::minutes(30),
            false,
            Some(NotificationAction::new("View Markets", "/marketview")),
        ),
        Notification::with_fields(
            "2",
            Category::Farm,
            "Your field #3 may need irrigation today based on soil moisture readings",
            now - Duration::hours(2),
            false,
            None,
        ),
        Notification::with_fields(
            "3",
            Category::Market,
            "New inquiry received for your tomato listing",
            now - Duration::hours(3),
            false,
            Some(NotificationAction::new(
                "View Inquiry",
                "/marketview?tab=mylistings",
            )),
        ),
        Notification::with_fields(
            "4",
            Category::Farm,
            "Weather alert: Heavy rainfall expected tomorrow in your region",
            now - Duration::hours(5),
            true,
            None,
        ),
        Notification::with_fields(
            "5",
            Category::Farm,
            "Reminder: Time to apply fertilizer to your maize crops",
            now - Duration::hours(24),
            true,
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_ids_are_unique() {
        let a = NotificationId::new();
        let b = NotificationId::new();
        assert_ne!(a, b);
        assert_eq!(NotificationId::from("7").as_str(), "7");
    }

    #[test]
    fn category_parse_and_display() {
        assert_eq!("market".parse::<Category>().unwrap(), Category::Market);
        assert_eq!(" Farm ".parse::<Category>().unwrap(), Category::Farm);
        assert!("weather".parse::<Category>().is_err());
        assert_eq!(Category::Farm.to_string(), "farm");
    }

    #[test]
    fn draft_becomes_unread_record() {
        let now = Utc::now();
        let draft = NotificationDraft::farm("Check fences").with_action("Open", "/calendar");
        let record = Notification::from_draft(draft, now);

        assert!(!record.is_read());
        assert_eq!(record.category(), Category::Farm);
        assert_eq!(record.timestamp(), now);
        assert_eq!(record.action().map(|a| a.url.as_str()), Some("/calendar"));
    }

    #[test]
    fn mark_read_is_one_way() {
        let mut record = Notification::from_draft(NotificationDraft::market("x"), Utc::now());
        assert!(record.mark_read());
        assert!(!record.mark_read());
        assert!(record.is_read());
    }

    #[test]
    fn seed_fixture_shape() {
        let now = Utc::now();
        let seed = seed_notifications(now);

        assert_eq!(seed.len(), 5);
        assert_eq!(seed.iter().filter(|n| !n.is_read()).count(), 3);
        assert!(seed.iter().all(|n| n.timestamp() < now));
    }

    #[test]
    fn serializes_lowercase_category() {
        let record = Notification::from_draft(NotificationDraft::market("Wheat up"), Utc::now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["category"], "market");
        assert!(json.get("action").is_none());
    }
}
