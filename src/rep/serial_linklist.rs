//! Linked-list representation (mutex serialized)
//!
//! One mutex guards every structural operation and every read of the list.
//! Point lookups scan from the tail and surface only the most recent
//! matching entry: last write wins, and `callback`'s return value is not
//! consulted because there is never a second call.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;

use crate::arena::KeyHandle;
use crate::entry::LookupKey;

use super::iterator::RepIterator;
use super::node_list::NodeList;
use super::snapshot::Layout;
use super::RepCore;

struct SerialState {
    list: NodeList,
    frozen: Option<Arc<[Bytes]>>,
}

pub struct SerialLinkListRep {
    core: RepCore,
    state: Mutex<SerialState>,
}

impl SerialLinkListRep {
    pub(crate) fn new(core: RepCore, expected_entries: usize) -> Self {
        Self {
            core,
            state: Mutex::new(SerialState {
                list: NodeList::with_capacity(expected_entries),
                frozen: None,
            }),
        }
    }

    pub(crate) fn core(&self) -> &RepCore {
        &self.core
    }

    pub fn insert(&self, handle: KeyHandle) {
        let entry = self.core.claim(handle);
        let mut state = self.state.lock();
        assert!(
            state.frozen.is_none(),
            "insert into a read-only table representation"
        );
        state.list.push_back(entry);
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        let cmp = self.core.comparator();
        let state = self.state.lock();
        state.list.iter_rev().any(|e| cmp.compare(e, key).is_eq())
    }

    /// Hand the newest version matching `lookup` to `callback`, if any
    pub fn get<F>(&self, lookup: &LookupKey, mut callback: F)
    where
        F: FnMut(&[u8]) -> bool,
    {
        let cmp = self.core.comparator();
        let newest = {
            let state = self.state.lock();
            state
                .list
                .iter_rev()
                .find(|e| lookup.matches(cmp, &e[..]))
                .cloned()
        };

        if let Some(entry) = newest {
            callback(&entry[..]);
        }
    }

    pub fn mark_read_only(&self) {
        let mut state = self.state.lock();
        assert!(
            state.frozen.is_none(),
            "mark_read_only called on a read-only table representation"
        );
        let entries = state.list.collect_entries();
        let count = entries.len();
        state.frozen = Some(entries);
        drop(state);

        debug!(rep = self.core.id(), entries = count, "serial linklist rep marked read-only");
    }

    pub fn is_read_only(&self) -> bool {
        self.state.lock().frozen.is_some()
    }

    pub fn approximate_memory_usage(&self) -> usize {
        let state = self.state.lock();
        let frozen = state
            .frozen
            .as_ref()
            .map_or(0, |f| f.len() * std::mem::size_of::<Bytes>());
        state.list.approximate_memory_usage() + frozen
    }

    /// Iterator over a private, independently sorted view
    pub fn iter(&self) -> RepIterator {
        let start = Instant::now();
        let (entries, copied) = {
            let state = self.state.lock();
            match &state.frozen {
                Some(frozen) => (Arc::clone(frozen), false),
                None => (state.list.collect_entries(), true),
            }
        };
        if copied {
            self.core.stats().record_snapshot(start.elapsed());
        }
        RepIterator::new(Arc::new(self.core.snapshot(entries, Layout::deferred())))
    }

    pub fn len(&self) -> usize {
        self.state.lock().list.len()
    }
}
