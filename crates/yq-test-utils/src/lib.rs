//! Testing utilities for the YieldQuip workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use yq_notify::{
    seed_notifications, Category, Notification, NotificationStore, StoreConfig, Toast, Toaster,
};

/// Toaster that keeps every toast for later assertions
#[derive(Debug, Default)]
pub struct RecordingToaster {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingToaster {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.toasts.lock().len()
    }
}

impl Toaster for RecordingToaster {
    fn toast(&self, toast: Toast) {
        self.toasts.lock().push(toast);
    }
}

pub fn quiet_config() -> StoreConfig {
    StoreConfig::new().with_generator(false)
}

/// Seeded store without a generator, plus its toast recorder
pub fn setup_seeded_store() -> (NotificationStore, Arc<RecordingToaster>) {
    setup_store_with(seed_notifications(Utc::now()))
}

pub fn setup_store_with(seed: Vec<Notification>) -> (NotificationStore, Arc<RecordingToaster>) {
    let toaster = RecordingToaster::new();
    let store = NotificationStore::create(&quiet_config(), seed, toaster.clone()).unwrap();
    (store, toaster)
}

/// Store with the generator running at `interval_secs`, fixed seed.
/// Must be called inside a Tokio runtime.
pub fn setup_generating_store(
    interval_secs: u64,
    seed: u64,
) -> (NotificationStore, Arc<RecordingToaster>) {
    let toaster = RecordingToaster::new();
    let config = StoreConfig::new()
        .with_interval(std::time::Duration::from_secs(interval_secs))
        .with_seed(seed);
    let store = NotificationStore::create(&config, Vec::new(), toaster.clone()).unwrap();
    (store, toaster)
}

/// Record with a fixed age relative to `now`
pub fn record_aged(
    id: &str,
    category: Category,
    now: DateTime<Utc>,
    age_minutes: i64,
    read: bool,
) -> Notification {
    Notification::with_fields(
        id,
        category,
        format!("{category} record {id}"),
        now - Duration::minutes(age_minutes),
        read,
        None,
    )
}

/// Panic unless the list is newest first
pub fn assert_newest_first(list: &[Notification]) {
    for pair in list.windows(2) {
        assert!(
            pair[0].timestamp() >= pair[1].timestamp(),
            "{} ({}) listed before newer {} ({})",
            pair[0].id(),
            pair[0].timestamp(),
            pair[1].id(),
            pair[1].timestamp()
        );
    }
}
