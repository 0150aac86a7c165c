#![forbid(unsafe_code)]

//! Most-recently-opened file list.
//!
//! Entries are stored in the property file under `File1`..`FileN`, most
//! recent first. Unused slots are written as empty strings so a shrinking
//! list does not leave stale entries behind.

use std::collections::VecDeque;

use crate::store::PropertyStore;

/// Default number of remembered files.
pub const DEFAULT_CAPACITY: usize = 5;

/// Upper bound on the capacity; larger requests are clamped.
pub const MAX_CAPACITY: usize = 64;

/// Property key for the `index`-th entry (1-based).
#[must_use]
pub fn slot_key(index: usize) -> String {
    format!("File{index}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentFiles {
    capacity: usize,
    entries: VecDeque<String>,
}

impl Default for RecentFiles {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecentFiles {
    /// Empty list holding at most `capacity` entries (clamped to
    /// [`MAX_CAPACITY`]).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.min(MAX_CAPACITY),
            entries: VecDeque::new(),
        }
    }

    /// Read `File1`..`File<capacity>`, skipping empty slots.
    #[must_use]
    pub fn load(store: &PropertyStore, capacity: usize) -> Self {
        let mut recent = Self::new(capacity);
        for index in 1..=recent.capacity {
            match store.get(&slot_key(index)) {
                Some(path) if !path.is_empty() => recent.entries.push_back(path.to_string()),
                _ => {}
            }
        }
        recent
    }

    /// Write every slot, blanking the ones past the end of the list.
    pub fn save(&self, store: &mut PropertyStore) {
        for index in 1..=self.capacity {
            let value = self.entries.get(index - 1).map_or("", String::as_str);
            store.set(slot_key(index), value);
        }
    }

    /// Move `path` to the front, dropping the oldest entry beyond capacity.
    pub fn put(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.remove(&path);
        self.entries.push_front(path);
        self.entries.truncate(self.capacity);
    }

    /// Forget `path`. Returns `false` if it was not listed.
    pub fn remove(&mut self, path: &str) -> bool {
        match self.entries.iter().position(|p| p == path) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|p| p == path)
    }

    /// Most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn most_recent(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
