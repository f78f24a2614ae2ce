//! Notification store
//!
//! Single owner of every notification record for the life of the app:
//! - Add, mark-read, mark-all-read and clear
//! - Newest-first and per-category views, recomputed on each call
//! - Unread count, computed on each call
//! - Event broadcast for subscribers
//! - The background generator and its teardown
//!
//! Every operation takes the state lock once and finishes its update before
//! releasing it. Toasts and events go out after the lock is dropped.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::generator::{generator_rng, GeneratorTicket};
use crate::toast::{Toast, Toaster};
use crate::types::{Category, Notification, NotificationDraft, NotificationId};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;

/// Store lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Accepting calls, generator running (if enabled)
    Active,
    /// Generator stopped, every call rejected
    TornDown,
}

/// Change notifications sent to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A record was created
    Added(Notification),
    /// One record flipped to read
    Read(NotificationId),
    /// Mark-all changed `count` records
    AllRead { count: usize },
    /// Clear removed `removed` records
    Cleared { removed: usize },
    /// Store was torn down
    TornDown,
}

#[derive(Debug)]
struct Entry {
    seq: u64,
    notification: Notification,
}

#[derive(Debug)]
struct StoreState {
    lifecycle: Lifecycle,
    entries: Vec<Entry>,
    next_seq: u64,
}

impl StoreState {
    fn check(&self, operation: &'static str) -> Result<(), StoreError> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::TornDown => {
                tracing::warn!(operation, "call on torn-down notification store");
                Err(StoreError::Inactive)
            }
        }
    }

    fn push(&mut self, notification: Notification) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { seq, notification });
    }

    fn sorted(&self) -> Vec<Notification> {
        newest_first(&self.entries)
    }
}

/// Newest first by timestamp; equal timestamps put the later-created record first
fn newest_first(entries: &[Entry]) -> Vec<Notification> {
    let mut ordered: Vec<&Entry> = entries.iter().collect();
    ordered.sort_by(|a, b| {
        b.notification
            .timestamp()
            .cmp(&a.notification.timestamp())
            .then(b.seq.cmp(&a.seq))
    });
    ordered
        .into_iter()
        .map(|entry| entry.notification.clone())
        .collect()
}

/// Keep records of one category, preserving order
#[must_use]
pub fn filter_category(notifications: &[Notification], category: Category) -> Vec<Notification> {
    notifications
        .iter()
        .filter(|n| n.category() == category)
        .cloned()
        .collect()
}

/// Count unread records
#[must_use]
pub fn count_unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read()).count()
}

struct Shared {
    state: Mutex<StoreState>,
    events: broadcast::Sender<StoreEvent>,
    toaster: Arc<dyn Toaster>,
    generator: Mutex<Option<GeneratorTicket>>,
}

impl Shared {
    fn insert(
        &self,
        draft: NotificationDraft,
        operation: &'static str,
    ) -> Result<Notification, StoreError> {
        let record = {
            let mut state = self.state.lock();
            state.check(operation)?;
            let record = Notification::from_draft(draft, Utc::now());
            state.push(record.clone());
            record
        };

        tracing::debug!(id = %record.id(), category = %record.category(), "notification added");
        self.toaster.toast(Toast::for_notification(&record));
        let _ = self.events.send(StoreEvent::Added(record.clone()));
        Ok(record)
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(ticket) = self.generator.get_mut().as_ref() {
            ticket.cancel();
        }
    }
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("state", &self.state)
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

/// Handle on a notification store
///
/// Cheap to clone; every clone talks to the same store. Created once by the
/// composition root and passed to consumers explicitly.
#[derive(Debug, Clone)]
pub struct NotificationStore {
    shared: Arc<Shared>,
}

impl NotificationStore {
    /// Create a store from seed records and start its generator
    ///
    /// Seed records with a duplicate id are dropped (first one wins).
    ///
    /// # Errors
    /// - `StoreError::Config` if `config` fails validation
    /// - `StoreError::NoRuntime` if the generator is enabled and no Tokio
    ///   runtime is running
    pub fn create(
        config: &StoreConfig,
        seed: Vec<Notification>,
        toaster: Arc<dyn Toaster>,
    ) -> Result<Self, StoreError> {
        config.validate()?;

        let mut state = StoreState {
            lifecycle: Lifecycle::Active,
            entries: Vec::with_capacity(seed.len()),
            next_seq: 0,
        };
        let mut seen = HashSet::new();
        for record in seed {
            if seen.insert(record.id().clone()) {
                state.push(record);
            } else {
                tracing::warn!(id = %record.id(), "dropping seed notification with duplicate id");
            }
        }

        let (events, _) = broadcast::channel(config.event_capacity);
        let shared = Arc::new(Shared {
            state: Mutex::new(state),
            events,
            toaster,
            generator: Mutex::new(None),
        });

        if config.generator_enabled {
            let runtime = tokio::runtime::Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
            let weak: Weak<Shared> = Arc::downgrade(&shared);
            let ticket = GeneratorTicket::start(
                &runtime,
                config.generator_interval(),
                generator_rng(config.generator_seed),
                move |draft| {
                    let Some(shared) = weak.upgrade() else {
                        return false;
                    };
                    match shared.insert(draft, "generator") {
                        Ok(record) => {
                            tracing::info!(
                                id = %record.id(),
                                category = %record.category(),
                                "generated notification: {}",
                                record.message()
                            );
                            true
                        }
                        Err(_) => false,
                    }
                },
            );
            *shared.generator.lock() = Some(ticket);
        }

        tracing::info!(
            seeded = shared.state.lock().entries.len(),
            generator = config.generator_enabled,
            interval_secs = config.generator_interval_secs,
            "notification store created"
        );

        Ok(Self { shared })
    }

    /// Add a notification
    ///
    /// Raises one toast and broadcasts [`StoreEvent::Added`].
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn add_notification(&self, draft: NotificationDraft) -> Result<NotificationId, StoreError> {
        self.shared
            .insert(draft, "add_notification")
            .map(|record| record.id().clone())
    }

    /// Mark one record read
    ///
    /// Unknown ids are ignored. Returns true if a record changed state.
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn mark_as_read(&self, id: &NotificationId) -> Result<bool, StoreError> {
        let changed = {
            let mut state = self.shared.state.lock();
            state.check("mark_as_read")?;
            state
                .entries
                .iter_mut()
                .find(|entry| entry.notification.id() == id)
                .is_some_and(|entry| entry.notification.mark_read())
        };

        if changed {
            tracing::debug!(%id, "notification marked read");
            let _ = self.shared.events.send(StoreEvent::Read(id.clone()));
        }
        Ok(changed)
    }

    /// Mark every record read. Returns how many changed.
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn mark_all_as_read(&self) -> Result<usize, StoreError> {
        let count = {
            let mut state = self.shared.state.lock();
            state.check("mark_all_as_read")?;
            state
                .entries
                .iter_mut()
                .map(|entry| entry.notification.mark_read())
                .filter(|changed| *changed)
                .count()
        };

        if count > 0 {
            tracing::debug!(count, "all notifications marked read");
            let _ = self.shared.events.send(StoreEvent::AllRead { count });
        }
        Ok(count)
    }

    /// Remove every record. Returns how many were removed.
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn clear_notifications(&self) -> Result<usize, StoreError> {
        let removed = {
            let mut state = self.shared.state.lock();
            state.check("clear_notifications")?;
            let removed = state.entries.len();
            state.entries.clear();
            removed
        };

        if removed > 0 {
            tracing::debug!(removed, "notifications cleared");
            let _ = self.shared.events.send(StoreEvent::Cleared { removed });
        }
        Ok(removed)
    }

    /// All records, newest first
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn notifications(&self) -> Result<Vec<Notification>, StoreError> {
        let state = self.shared.state.lock();
        state.check("notifications")?;
        Ok(state.sorted())
    }

    /// Records of one category, newest first
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn notifications_in(&self, category: Category) -> Result<Vec<Notification>, StoreError> {
        let all = self.notifications()?;
        Ok(filter_category(&all, category))
    }

    /// Look up one record
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn get(&self, id: &NotificationId) -> Result<Option<Notification>, StoreError> {
        let state = self.shared.state.lock();
        state.check("get")?;
        Ok(state
            .entries
            .iter()
            .find(|entry| entry.notification.id() == id)
            .map(|entry| entry.notification.clone()))
    }

    /// Number of unread records
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn unread_count(&self) -> Result<usize, StoreError> {
        let state = self.shared.state.lock();
        state.check("unread_count")?;
        Ok(state
            .entries
            .iter()
            .filter(|entry| !entry.notification.is_read())
            .count())
    }

    /// Number of records
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn len(&self) -> Result<usize, StoreError> {
        let state = self.shared.state.lock();
        state.check("len")?;
        Ok(state.entries.len())
    }

    /// Whether the store holds no records
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }

    /// Subscribe to change events
    ///
    /// # Errors
    /// - `StoreError::Inactive` after teardown
    pub fn subscribe(&self) -> Result<broadcast::Receiver<StoreEvent>, StoreError> {
        let state = self.shared.state.lock();
        state.check("subscribe")?;
        Ok(self.shared.events.subscribe())
    }

    /// Current lifecycle state
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.state.lock().lifecycle
    }

    /// Whether the store still accepts calls
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle() == Lifecycle::Active
    }

    /// Whether the generator task is alive
    #[must_use]
    pub fn generator_running(&self) -> bool {
        self.shared
            .generator
            .lock()
            .as_ref()
            .is_some_and(GeneratorTicket::is_running)
    }

    /// Stop the generator and reject all further calls
    ///
    /// Returns true for the call that performed the teardown; later calls
    /// are no-ops returning false.
    pub fn teardown(&self) -> bool {
        {
            let mut state = self.shared.state.lock();
            if state.lifecycle == Lifecycle::TornDown {
                return false;
            }
            state.lifecycle = Lifecycle::TornDown;
        }

        if let Some(ticket) = self.shared.generator.lock().as_ref() {
            ticket.cancel();
        }
        let _ = self.shared.events.send(StoreEvent::TornDown);
        tracing::info!("notification store torn down");
        true
    }

    /// Tear down and wait for the generator task to exit
    pub async fn shutdown(&self) {
        self.teardown();
        let join = self
            .shared
            .generator
            .lock()
            .as_mut()
            .and_then(GeneratorTicket::take_join);
        if let Some(join) = join {
            if let Err(e) = join.await {
                tracing::error!("notification generator task failed: {}", e);
            }
        }
    }
}
