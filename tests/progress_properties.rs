//! 进度存储操作的属性测试

use std::sync::Arc;

use proptest::prelude::*;
use woordjes::{MemoryStore, ProgressStore};

fn fresh_store() -> ProgressStore {
    ProgressStore::load(Arc::new(MemoryStore::new()))
}

fn word_id() -> impl Strategy<Value = String> {
    prop_oneof![
        "(greetings|numbers|food|home|transport)-[1-5]",
        "[a-f0-9]{8}",
    ]
}

fn word_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word_id(), 0..12)
}

proptest! {
    #[test]
    fn toggle_twice_restores_favorites(initial in word_ids(), id in word_id()) {
        let store = fresh_store();
        for f in &initial {
            if !store.is_favorite(f) {
                store.toggle_favorite(f).unwrap();
            }
        }
        let before = store.favorites();

        let favorited = store.toggle_favorite(&id).unwrap();
        prop_assert_eq!(favorited, !before.contains(&id));
        store.toggle_favorite(&id).unwrap();

        let mut after = store.favorites();
        let mut expected = before;
        after.sort();
        expected.sort();
        prop_assert_eq!(after, expected);
    }

    #[test]
    fn mark_as_learned_is_idempotent(ids in word_ids()) {
        let store = fresh_store();
        for id in &ids {
            store.mark_as_learned(id).unwrap();
        }
        let once = store.learned_ids();

        for id in &ids {
            prop_assert!(!store.mark_as_learned(id).unwrap());
        }
        prop_assert_eq!(store.learned_ids(), once.clone());

        let mut distinct = ids.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(once.len(), distinct.len());
    }

    #[test]
    fn remove_favorites_drops_exactly_the_given_ids(
        initial in word_ids(),
        remove in word_ids(),
    ) {
        let store = fresh_store();
        for f in &initial {
            if !store.is_favorite(f) {
                store.toggle_favorite(f).unwrap();
            }
        }
        let before = store.favorites();

        let removed = store.remove_favorites(remove.as_slice()).unwrap();
        let after = store.favorites();

        let expected: Vec<String> = before
            .iter()
            .filter(|f| !remove.contains(*f))
            .cloned()
            .collect();
        prop_assert_eq!(removed, before.len() - expected.len());
        prop_assert_eq!(after, expected);
    }

    #[test]
    fn reset_progress_only_clears_learned(
        favorites in word_ids(),
        learned in word_ids(),
    ) {
        let store = fresh_store();
        for f in &favorites {
            if !store.is_favorite(f) {
                store.toggle_favorite(f).unwrap();
            }
        }
        for id in &learned {
            store.mark_as_learned(id).unwrap();
        }
        let favorites_before = store.favorites();
        let custom_before = store.custom_words();

        store.reset_progress().unwrap();

        prop_assert!(store.learned_ids().is_empty());
        prop_assert_eq!(store.favorites(), favorites_before);
        prop_assert_eq!(store.custom_words(), custom_before);
    }
}
