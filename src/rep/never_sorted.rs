//! Never-sorted vector representation
//!
//! Entries stay in arrival order for the whole lifetime of the table.
//! Iterators walk insertion order, `seek` is a linear predicate scan and
//! `seek_for_prev` is unsupported.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::arena::KeyHandle;
use crate::entry::LookupKey;

use super::iterator::RepIterator;
use super::snapshot::Layout;
use super::vec_store::{VecStore, View};
use super::RepCore;

pub struct NeverSortedVectorRep {
    core: RepCore,
    store: VecStore,
}

impl NeverSortedVectorRep {
    pub(crate) fn new(core: RepCore, expected_entries: usize) -> Self {
        Self {
            core,
            store: VecStore::with_capacity(expected_entries),
        }
    }

    pub(crate) fn core(&self) -> &RepCore {
        &self.core
    }

    pub fn insert(&self, handle: KeyHandle) {
        let entry = self.core.claim(handle);
        self.store.push(entry);
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.store.contains(key, self.core.comparator())
    }

    /// Linear scan for versions matching `lookup`
    ///
    /// Matches are gathered under the read lock, ordered newest first, and
    /// handed to `callback` (outside the lock) until it returns false.
    pub fn get<F>(&self, lookup: &LookupKey, mut callback: F)
    where
        F: FnMut(&[u8]) -> bool,
    {
        let cmp = self.core.comparator();
        let mut matches: Vec<Bytes> = self.store.with_entries(|entries| {
            entries
                .iter()
                .filter(|e| lookup.matches(cmp, &e[..]))
                .cloned()
                .collect()
        });
        matches.sort_by(|a, b| cmp.compare(a, b));

        for entry in &matches {
            if !callback(&entry[..]) {
                break;
            }
        }
    }

    pub fn mark_read_only(&self) {
        let frozen = self.store.freeze(|entries| self.core.snapshot(entries, Layout::Insertion));
        debug!(rep = self.core.id(), entries = frozen.len(), "never-sorted rep marked read-only");
    }

    pub fn is_read_only(&self) -> bool {
        self.store.is_frozen()
    }

    pub fn approximate_memory_usage(&self) -> usize {
        self.store.approximate_memory_usage()
    }

    pub fn iter(&self) -> RepIterator {
        match self.store.view(self.core.stats()) {
            View::Frozen(snapshot) => RepIterator::new(snapshot),
            View::Copied(entries) => {
                RepIterator::new(Arc::new(self.core.snapshot(entries, Layout::Insertion)))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }
}
