//! Linked-list representation (read/write locked)
//!
//! Appends link a new node after the tail. Nothing is ever kept sorted:
//! every iterator takes its own view and sorts it independently on first
//! use. Freezing captures the node entries once so post-freeze iterators
//! skip the copy, but they still each sort their own permutation.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::debug;

use crate::arena::KeyHandle;
use crate::entry::LookupKey;

use super::iterator::RepIterator;
use super::node_list::NodeList;
use super::snapshot::Layout;
use super::RepCore;

pub struct LinkListRep {
    core: RepCore,
    list: RwLock<NodeList>,
    /// Node entries captured at freeze time, oldest first
    frozen: OnceLock<Arc<[Bytes]>>,
}

impl LinkListRep {
    pub(crate) fn new(core: RepCore, expected_entries: usize) -> Self {
        Self {
            core,
            list: RwLock::new(NodeList::with_capacity(expected_entries)),
            frozen: OnceLock::new(),
        }
    }

    pub(crate) fn core(&self) -> &RepCore {
        &self.core
    }

    pub fn insert(&self, handle: KeyHandle) {
        let entry = self.core.claim(handle);
        let mut list = self.list.write();
        assert!(
            self.frozen.get().is_none(),
            "insert into a read-only table representation"
        );
        list.push_back(entry);
    }

    /// Scan from the tail (newest first) for an entry equal to `key`
    pub fn contains(&self, key: &[u8]) -> bool {
        let cmp = self.core.comparator();
        if let Some(frozen) = self.frozen.get() {
            return frozen.iter().rev().any(|e| cmp.compare(e, key).is_eq());
        }
        let list = self.list.read();
        list.iter_rev().any(|e| cmp.compare(e, key).is_eq())
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
        let list = self.list.write();
        assert!(
            self.frozen.get().is_none(),
            "mark_read_only called on a read-only table representation"
        );
        let entries = list.collect_entries();
        let count = entries.len();
        if self.frozen.set(entries).is_err() {
            unreachable!("frozen entries set while holding the write lock");
        }
        drop(list);

        debug!(rep = self.core.id(), entries = count, "linklist rep marked read-only");
    }

    pub fn is_read_only(&self) -> bool {
        self.frozen.get().is_some()
    }

    pub fn approximate_memory_usage(&self) -> usize {
        let list = self.list.read();
        let frozen = self
            .frozen
            .get()
            .map_or(0, |f| f.len() * std::mem::size_of::<Bytes>());
        list.approximate_memory_usage() + frozen
    }

    /// Iterator over a private, independently sorted view
    pub fn iter(&self) -> RepIterator {
        let entries = match self.frozen.get() {
            Some(frozen) => Arc::clone(frozen),
            None => self.copy_live(),
        };
        RepIterator::new(Arc::new(self.core.snapshot(entries, Layout::deferred())))
    }

    fn copy_live(&self) -> Arc<[Bytes]> {
        let start = Instant::now();
        let list = self.list.read();
        if let Some(frozen) = self.frozen.get() {
            return Arc::clone(frozen);
        }
        let entries = list.collect_entries();
        drop(list);

        self.core.stats().record_snapshot(start.elapsed());
        entries
    }

    pub fn len(&self) -> usize {
        self.list.read().len()
    }
}
