use proptest::prelude::*;
use std::collections::HashSet;
use yq_notify::prelude::*;
use yq_test_utils::{assert_newest_first, setup_seeded_store};

#[derive(Debug, Clone)]
enum Op {
    Add(Category, String),
    MarkRead(usize),
    MarkAll,
    Clear,
}

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::Market), Just(Category::Farm)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (category(), "[a-z ]{1,20}").prop_map(|(c, m)| Op::Add(c, m)),
        4 => (0usize..16).prop_map(Op::MarkRead),
        1 => Just(Op::MarkAll),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_feed_stays_newest_first_and_reads_stick(ops in prop::collection::vec(op(), 1..40)) {
        let (store, toaster) = setup_seeded_store();
        let mut marked: HashSet<NotificationId> = HashSet::new();
        let mut adds = 0usize;

        for op in ops {
            match op {
                Op::Add(category, message) => {
                    let id = store
                        .add_notification(NotificationDraft::new(category, message))
                        .unwrap();
                    adds += 1;
                    let first = store.notifications().unwrap().remove(0);
                    prop_assert_eq!(first.id(), &id);
                }
                Op::MarkRead(index) => {
                    let list = store.notifications().unwrap();
                    if let Some(target) = list.get(index) {
                        store.mark_as_read(target.id()).unwrap();
                        marked.insert(target.id().clone());
                    }
                }
                Op::MarkAll => {
                    store.mark_all_as_read().unwrap();
                    prop_assert_eq!(store.unread_count().unwrap(), 0);
                }
                Op::Clear => {
                    store.clear_notifications().unwrap();
                    prop_assert!(store.notifications().unwrap().is_empty());
                    marked.clear();
                }
            }

            let list = store.notifications().unwrap();
            assert_newest_first(&list);
            for record in &list {
                if marked.contains(record.id()) {
                    prop_assert!(record.is_read());
                }
            }
        }

        prop_assert_eq!(toaster.count(), adds);
    }

    #[test]
    fn prop_category_filter_is_exact(cats in prop::collection::vec(category(), 0..30)) {
        let (store, _toaster) = setup_seeded_store();
        store.clear_notifications().unwrap();
        for (i, category) in cats.iter().enumerate() {
            store.add_notification(NotificationDraft::new(*category, format!("n{i}"))).unwrap();
        }

        let all = store.notifications().unwrap();
        for category in Category::ALL {
            let expected: Vec<_> =
                all.iter().filter(|n| n.category() == category).cloned().collect();
            let filtered = store.notifications_in(category).unwrap();
            prop_assert_eq!(filtered.len(), cats.iter().filter(|c| **c == category).count());
            prop_assert!(filtered.iter().all(|n| n.category() == category));
            prop_assert_eq!(filtered, expected);
        }
    }

    #[test]
    fn prop_unread_count_matches_flags(reads in prop::collection::vec(any::<bool>(), 0..20)) {
        let (store, _toaster) = setup_seeded_store();
        store.clear_notifications().unwrap();
        let mut ids = Vec::new();
        for (i, _) in reads.iter().enumerate() {
            ids.push(store.add_notification(NotificationDraft::farm(format!("n{i}"))).unwrap());
        }
        for (id, read) in ids.iter().zip(&reads) {
            if *read {
                store.mark_as_read(id).unwrap();
            }
        }

        let expected = reads.iter().filter(|r| !**r).count();
        prop_assert_eq!(store.unread_count().unwrap(), expected);
    }
}
