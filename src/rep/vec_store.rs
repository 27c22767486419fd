//! Vector-backed entry store
//!
//! Shared backing for the three vector representations.
//!
//! ## Concurrency
//! - `live`: RwLock around the growable array; inserts take the write lock,
//!   readers that need a consistent view take the read lock just long enough
//!   to copy or scan
//! - `frozen`: set exactly once, under the write lock, by `freeze`. After
//!   that the live array is empty and never touched again, so readers go
//!   straight to the frozen snapshot without locking

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::comparator::KeyComparator;

use super::snapshot::Snapshot;
use super::stats::RepStats;

/// What a reader gets back from `VecStore::view`
pub(crate) enum View {
    /// The shared frozen snapshot
    Frozen(Arc<Snapshot>),

    /// A private copy of the live entries, in insertion order
    Copied(Arc<[Bytes]>),
}

pub(crate) struct VecStore {
    live: RwLock<Vec<Bytes>>,
    frozen: OnceLock<Arc<Snapshot>>,
}

impl VecStore {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            live: RwLock::new(Vec::with_capacity(capacity)),
            frozen: OnceLock::new(),
        }
    }

    /// Append in arrival order
    pub(crate) fn push(&self, entry: Bytes) {
        let mut live = self.live.write();
        assert!(
            self.frozen.get().is_none(),
            "insert into a read-only table representation"
        );
        live.push(entry);
    }

    /// Insert keeping the array in comparator order (after equal entries)
    pub(crate) fn insert_sorted(&self, entry: Bytes, cmp: &dyn KeyComparator) {
        let mut live = self.live.write();
        assert!(
            self.frozen.get().is_none(),
            "insert into a read-only table representation"
        );
        let at = live.partition_point(|e| cmp.compare(e, &entry).is_le());
        live.insert(at, entry);
    }

    /// Move the live entries into a snapshot built by `make`
    ///
    /// # Panics
    /// If the store is already frozen.
    pub(crate) fn freeze(&self, make: impl FnOnce(Arc<[Bytes]>) -> Snapshot) -> Arc<Snapshot> {
        let mut live = self.live.write();
        assert!(
            self.frozen.get().is_none(),
            "mark_read_only called on a read-only table representation"
        );

        let entries: Arc<[Bytes]> = std::mem::take(&mut *live).into();
        let snapshot = Arc::new(make(entries));
        if self.frozen.set(Arc::clone(&snapshot)).is_err() {
            unreachable!("frozen snapshot set while holding the write lock");
        }
        snapshot
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.frozen.get().is_some()
    }

    /// Either the frozen snapshot or a private copy of the live entries
    pub(crate) fn view(&self, stats: &RepStats) -> View {
        if let Some(frozen) = self.frozen.get() {
            return View::Frozen(Arc::clone(frozen));
        }

        let start = Instant::now();
        let live = self.live.read();
        // Re-check under the lock: a freeze may have emptied `live`
        if let Some(frozen) = self.frozen.get() {
            return View::Frozen(Arc::clone(frozen));
        }
        let copy: Arc<[Bytes]> = Arc::from(live.as_slice());
        drop(live);

        stats.record_snapshot(start.elapsed());
        View::Copied(copy)
    }

    /// Run `f` over the current entries in insertion (or stored) order
    ///
    /// Holds the read lock for the duration of `f` while mutable.
    pub(crate) fn with_entries<R>(&self, f: impl FnOnce(&[Bytes]) -> R) -> R {
        if let Some(frozen) = self.frozen.get() {
            return f(&frozen.entries()[..]);
        }
        let live = self.live.read();
        match self.frozen.get() {
            Some(frozen) => f(&frozen.entries()[..]),
            None => f(live.as_slice()),
        }
    }

    /// True iff some entry compares equal to `key`
    pub(crate) fn contains(&self, key: &[u8], cmp: &dyn KeyComparator) -> bool {
        if let Some(frozen) = self.frozen.get() {
            return frozen.contains(key);
        }
        self.with_entries(|entries| entries.iter().any(|e| cmp.compare(e, key).is_eq()))
    }

    pub(crate) fn len(&self) -> usize {
        self.with_entries(|entries| entries.len())
    }

    /// Pointer array + container overhead
    pub(crate) fn approximate_memory_usage(&self) -> usize {
        if let Some(frozen) = self.frozen.get() {
            return frozen.approximate_memory_usage();
        }
        let live = self.live.read();
        std::mem::size_of::<Vec<Bytes>>() + live.capacity() * std::mem::size_of::<Bytes>()
    }
}
