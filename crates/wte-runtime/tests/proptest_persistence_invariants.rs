//! Property-based invariant tests for settings persistence.
//!
//! 1. Any string map written by `PropertyStore::save` loads back unchanged.
//! 2. `RecentFiles` never exceeds its capacity and never lists a path twice.
//! 3. The most recent entry is always the last path put.
//! 4. A recent list survives a save/load cycle through a file.

use std::collections::BTreeMap;

use proptest::prelude::*;
use tempfile::TempDir;
use wte_runtime::{PropertyStore, RecentFiles};

fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_.]{0,12}"
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "a.txt", "b.txt", "notes.md", "dir/c.rs", "d\u{e9}j\u{e0}.txt", "e", "f.log",
    ])
    .prop_map(str::to_string)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn store_round_trips_through_file(
        values in prop::collection::btree_map(key_strategy(), any::<String>(), 0..12),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = PropertyStore::at(&path);
        for (key, value) in &values {
            store.set(key.clone(), value.clone());
        }
        store.save().unwrap();

        let loaded = PropertyStore::load_strict(&path).unwrap();
        let read: BTreeMap<String, String> = loaded
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        prop_assert_eq!(read, values);
    }

    #[test]
    fn recent_is_bounded_and_unique(
        capacity in 0usize..6,
        puts in prop::collection::vec(path_strategy(), 0..20),
    ) {
        let mut recent = RecentFiles::new(capacity);
        for path in &puts {
            recent.put(path.clone());
            prop_assert!(recent.len() <= capacity);

            let listed: Vec<&str> = recent.iter().collect();
            let mut deduped = listed.clone();
            deduped.sort_unstable();
            deduped.dedup();
            prop_assert_eq!(deduped.len(), listed.len());

            if capacity > 0 {
                prop_assert_eq!(recent.most_recent(), Some(path.as_str()));
            } else {
                prop_assert!(recent.is_empty());
            }
        }
    }

    #[test]
    fn recent_survives_save_and_load(
        capacity in 1usize..6,
        puts in prop::collection::vec(path_strategy(), 0..12),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let mut recent = RecentFiles::new(capacity);
        for p in puts {
            recent.put(p);
        }
        let mut store = PropertyStore::at(&path);
        recent.save(&mut store);
        store.save().unwrap();

        let loaded = RecentFiles::load(&PropertyStore::load(&path), capacity);
        prop_assert_eq!(loaded, recent);
    }
}
