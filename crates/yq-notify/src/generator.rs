//! Simulated notification feed
//!
//! Two halves:
//! - Pure content functions over an injected RNG, so tests can pin a seed
//! - A cancellable Tokio task that delivers one draft per interval
//!
//! The task is owned by the store through a [`GeneratorTicket`]; cancelling
//! the ticket stops the task for good.

use crate::types::{Category, NotificationDraft};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Commodities quoted in market updates
pub const COMMODITIES: [&str; 6] = ["Corn", "Wheat", "Soybeans", "Rice", "Potatoes", "Tomatoes"];

/// Advisory sentences used for farm updates
pub const FARM_UPDATES: [&str; 5] = [
    "Time to check soil moisture in Field #2",
    "Weather alert: Temperature will drop tonight",
    "Equipment maintenance reminder: Check tractor oil levels",
    "Scheduled harvest date approaching for your tomato crop",
    "Pest alert: Aphids detected in your kale field",
];

/// Pick a category, uniformly
#[must_use]
pub fn random_category<R: Rng + ?Sized>(rng: &mut R) -> Category {
    if rng.random_bool(0.5) {
        Category::Market
    } else {
        Category::Farm
    }
}

/// Compose a message for the given category
///
/// Market messages quote a commodity moving by 0.5% to 5.5%, one decimal.
#[must_use]
pub fn compose_message<R: Rng + ?Sized>(category: Category, rng: &mut R) -> String {
    match category {
        Category::Market => {
            let commodity = COMMODITIES[rng.random_range(0..COMMODITIES.len())];
            let direction = if rng.random_bool(0.5) {
                "increased"
            } else {
                "decreased"
            };
            let percentage: f64 = rng.random_range(0.5..5.5);
            format!("{commodity} prices have {direction} by {percentage:.1}% in the last hour")
        }
        Category::Farm => FARM_UPDATES[rng.random_range(0..FARM_UPDATES.len())].to_string(),
    }
}

/// One synthetic draft: random category, then a message for it
#[must_use]
pub fn generate_draft<R: Rng + ?Sized>(rng: &mut R) -> NotificationDraft {
    let category = random_category(rng);
    let message = compose_message(category, rng);
    NotificationDraft::new(category, message)
}

/// RNG for the running generator
#[must_use]
pub fn generator_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Handle on a running generator task
///
/// Cancellation is idempotent. The join handle can be taken once to await
/// the task's exit.
#[derive(Debug)]
pub struct GeneratorTicket {
    cancel: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl GeneratorTicket {
    /// Spawn the generator on `runtime`
    ///
    /// The first draft is produced one full `period` after start. `deliver`
    /// returns false to stop the task (e.g. the store went away). A period
    /// too long to schedule leaves the task idle until cancelled.
    pub fn start<F>(
        runtime: &Handle,
        period: Duration,
        mut rng: StdRng,
        mut deliver: F,
    ) -> Self
    where
        F: FnMut(NotificationDraft) -> bool + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let join = runtime.spawn(async move {
            let Some(first) = Instant::now().checked_add(period) else {
                tracing::warn!(?period, "generator period out of range, not scheduling");
                token.cancelled().await;
                return;
            };
            let mut ticker = tokio::time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if token.is_cancelled() || !deliver(generate_draft(&mut rng)) {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("notification generator stopped");
        });

        Self {
            cancel,
            join: Some(join),
        }
    }

    /// Stop the task. Safe to call repeatedly.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation was requested
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the task is still alive
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.is_cancelled() && self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Take the join handle (once)
    pub fn take_join(&mut self) -> Option<JoinHandle<()>> {
        self.join.take()
    }
}

impl Drop for GeneratorTicket {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn farm_messages_come_from_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let message = compose_message(Category::Farm, &mut rng);
            assert!(FARM_UPDATES.contains(&message.as_str()));
        }
    }

    #[test]
    fn market_messages_quote_commodity_and_percentage() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let message = compose_message(Category::Market, &mut rng);
            let commodity = message.split(' ').next().unwrap();
            assert!(COMMODITIES.contains(&commodity), "{message}");
            assert!(message.ends_with("% in the last hour"), "{message}");
            assert!(
                message.contains(" increased by ") || message.contains(" decreased by "),
                "{message}"
            );

            let pct: f64 = message
                .split(" by ")
                .nth(1)
                .and_then(|rest| rest.split('%').next())
                .unwrap()
                .parse()
                .unwrap();
            assert!((0.5..=5.5).contains(&pct), "{message}");
        }
    }

    #[test]
    fn same_seed_same_drafts() {
        let mut a = generator_rng(Some(99));
        let mut b = generator_rng(Some(99));
        let left: Vec<_> = (0..20).map(|_| generate_draft(&mut a)).collect();
        let right: Vec<_> = (0..20).map(|_| generate_draft(&mut b)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn draft_matches_pure_functions() {
        let mut expected_rng = StdRng::seed_from_u64(5);
        let category = random_category(&mut expected_rng);
        let message = compose_message(category, &mut expected_rng);

        let draft = generate_draft(&mut StdRng::seed_from_u64(5));
        assert_eq!(draft.category, category);
        assert_eq!(draft.message, message);
        assert!(draft.action.is_none());
    }

    #[test]
    fn both_categories_show_up() {
        let mut rng = StdRng::seed_from_u64(3);
        let drafts: Vec<_> = (0..64).map(|_| generate_draft(&mut rng)).collect();
        assert!(drafts.iter().any(|d| d.category == Category::Market));
        assert!(drafts.iter().any(|d| d.category == Category::Farm));
    }

    #[tokio::test(start_paused = true)]
    async fn ticket_delivers_per_period_until_cancelled() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let period = Duration::from_secs(300);

        let mut ticket =
            GeneratorTicket::start(&Handle::current(), period, generator_rng(Some(1)), move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            });

        tokio::time::sleep(period - Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        ticket.cancel();
        ticket.cancel();
        assert!(!ticket.is_running());
        ticket.take_join().unwrap().await.unwrap();

        tokio::time::sleep(period * 3).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deliver_false_stops_task() {
        let period = Duration::from_secs(10);
        let mut ticket =
            GeneratorTicket::start(&Handle::current(), period, generator_rng(Some(1)), |_| false);

        tokio::time::sleep(period + Duration::from_secs(1)).await;
        ticket.take_join().unwrap().await.unwrap();
        assert!(!ticket.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn unschedulable_period_idles_until_cancelled() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let mut ticket = GeneratorTicket::start(
            &Handle::current(),
            Duration::MAX,
            generator_rng(Some(1)),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            },
        );

        tokio::task::yield_now().await;
        assert!(ticket.is_running());

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        ticket.cancel();
        ticket.take_join().unwrap().await.unwrap();
    }
}
