//! Sort-on-freeze vector representation
//!
//! Appends into an unsorted array while mutable. `mark_read_only` moves the
//! array into one shared snapshot whose comparator order is computed the
//! first time any iterator needs it and then reused by every later iterator.

use std::sync::Arc;

use tracing::debug;

use crate::arena::KeyHandle;
use crate::entry::LookupKey;

use super::iterator::RepIterator;
use super::snapshot::Layout;
use super::vec_store::{VecStore, View};
use super::RepCore;

pub struct VectorRep {
    core: RepCore,
    store: VecStore,
}

impl VectorRep {
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

    /// Seek to the lookup key on the sorted view, then feed entries to
    /// `callback` until it returns false
    pub fn get<F>(&self, lookup: &LookupKey, mut callback: F)
    where
        F: FnMut(&[u8]) -> bool,
    {
        let mut iter = self.iter();
        iter.seek(lookup.memtable_key());
        while iter.valid() && callback(iter.key()) {
            iter.next();
        }
    }

    /// Freeze; the shared snapshot is not sorted until first iterated
    pub fn mark_read_only(&self) {
        let frozen = self.store.freeze(|entries| self.core.snapshot(entries, Layout::deferred()));
        debug!(rep = self.core.id(), entries = frozen.len(), "vector rep marked read-only");
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
                RepIterator::new(Arc::new(self.core.snapshot(entries, Layout::deferred())))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }
}
