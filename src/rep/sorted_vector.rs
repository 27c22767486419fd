//! Always-sorted vector representation
//!
//! Keeps the array in comparator order on every insert (binary search +
//! shift), so iterators never sort: mutable-phase iterators copy an already
//! ordered array and the frozen snapshot is ordered from the start.

use std::sync::Arc;

use tracing::debug;

use crate::arena::KeyHandle;
use crate::entry::LookupKey;

use super::iterator::RepIterator;
use super::snapshot::Layout;
use super::vec_store::{VecStore, View};
use super::RepCore;

pub struct SortedVectorRep {
    core: RepCore,
    store: VecStore,
}

impl SortedVectorRep {
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
        self.store.insert_sorted(entry, self.core.comparator());
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        let cmp = self.core.comparator();
        self.store.with_entries(|entries| {
            let pos = entries.partition_point(|e| cmp.compare(e, key).is_lt());
            pos < entries.len() && cmp.compare(&entries[pos], key).is_eq()
        })
    }

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

    pub fn mark_read_only(&self) {
        let frozen = self.store.freeze(|entries| self.core.snapshot(entries, Layout::Presorted));
        debug!(rep = self.core.id(), entries = frozen.len(), "sorted vector rep marked read-only");
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
                RepIterator::new(Arc::new(self.core.snapshot(entries, Layout::Presorted)))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }
}
