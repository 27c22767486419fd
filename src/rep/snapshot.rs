//! Point-in-time entry views
//!
//! A `Snapshot` is the fixed set of entries an iterator walks. Entries are
//! kept in insertion order; the comparator order, when one is needed, is a
//! permutation built at most once.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use bytes::Bytes;
use tracing::debug;

use crate::comparator::KeyComparator;

use super::stats::RepStats;

/// How positions map onto the stored entries
pub(crate) enum Layout {
    /// Positions follow insertion order; no ordering is ever established
    Insertion,

    /// Entries are already in comparator order
    Presorted,

    /// Comparator order computed on first use and cached
    Deferred(OnceLock<Box<[usize]>>),
}

impl Layout {
    pub(crate) fn deferred() -> Self {
        Layout::Deferred(OnceLock::new())
    }
}

pub(crate) struct Snapshot {
    entries: Arc<[Bytes]>,
    layout: Layout,
    cmp: Arc<dyn KeyComparator>,
    stats: Arc<RepStats>,
}

impl Snapshot {
    pub(crate) fn new(
        entries: Arc<[Bytes]>,
        layout: Layout,
        cmp: Arc<dyn KeyComparator>,
        stats: Arc<RepStats>,
    ) -> Self {
        Self {
            entries,
            layout,
            cmp,
            stats,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in insertion order
    pub(crate) fn entries(&self) -> &Arc<[Bytes]> {
        &self.entries
    }

    /// Whether positions follow comparator order
    pub(crate) fn is_ordered(&self) -> bool {
        !matches!(self.layout, Layout::Insertion)
    }

    /// Whether the comparator order is available without sorting
    pub(crate) fn is_sorted(&self) -> bool {
        match &self.layout {
            Layout::Insertion => false,
            Layout::Presorted => true,
            Layout::Deferred(order) => order.get().is_some(),
        }
    }

    /// Establish the comparator order if this layout defers it
    ///
    /// Concurrent callers block until the first one finishes; the sort runs
    /// exactly once per snapshot.
    pub(crate) fn ensure_sorted(&self) {
        if let Layout::Deferred(order) = &self.layout {
            order.get_or_init(|| self.sort());
        }
    }

    fn sort(&self) -> Box<[usize]> {
        let start = Instant::now();

        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_unstable_by(|&a, &b| self.cmp.compare(&self.entries[a], &self.entries[b]));

        let elapsed = start.elapsed();
        self.stats.record_sort(elapsed);
        debug!(
            entries = order.len(),
            elapsed_us = elapsed.as_micros() as u64,
            comparator = self.cmp.name(),
            "sorted snapshot"
        );

        order.into_boxed_slice()
    }

    /// Entry at `pos` in this snapshot's iteration order
    pub(crate) fn at(&self, pos: usize) -> &Bytes {
        match &self.layout {
            Layout::Deferred(order) => {
                let order = order.get_or_init(|| self.sort());
                &self.entries[order[pos]]
            }
            Layout::Insertion | Layout::Presorted => &self.entries[pos],
        }
    }

    /// Number of leading positions (in comparator order) whose entry
    /// satisfies `pred`; `pred` must be monotone over that order
    fn partition_point(&self, pred: impl Fn(&[u8]) -> bool) -> usize {
        match &self.layout {
            Layout::Insertion => {
                panic!("binary search over an insertion-ordered snapshot")
            }
            Layout::Presorted => self.entries.partition_point(|e| pred(e.as_ref())),
            Layout::Deferred(order) => {
                let order = order.get_or_init(|| self.sort());
                order.partition_point(|&i| pred(self.entries[i].as_ref()))
            }
        }
    }

    /// First position whose entry is >= `target`
    pub(crate) fn lower_bound(&self, target: &[u8]) -> usize {
        self.partition_point(|e| self.cmp.compare(e, target).is_lt())
    }

    /// First position whose entry is > `target`
    pub(crate) fn upper_bound(&self, target: &[u8]) -> usize {
        self.partition_point(|e| self.cmp.compare(e, target).is_le())
    }

    /// First position in insertion order whose entry is >= `target`
    pub(crate) fn find_at_or_after(&self, target: &[u8]) -> usize {
        self.entries
            .iter()
            .position(|e| self.cmp.compare(e, target).is_ge())
            .unwrap_or(self.entries.len())
    }

    /// True iff some entry compares equal to `key`
    ///
    /// Uses binary search once an order exists; never sorts on its own.
    pub(crate) fn contains(&self, key: &[u8]) -> bool {
        if self.is_sorted() {
            let pos = self.lower_bound(key);
            pos < self.len() && self.cmp.compare(self.at(pos), key).is_eq()
        } else {
            self.entries
                .iter()
                .any(|e| self.cmp.compare(e, key).is_eq())
        }
    }

    /// Rough heap footprint of the view (pointers + permutation)
    pub(crate) fn approximate_memory_usage(&self) -> usize {
        let order = match &self.layout {
            Layout::Deferred(order) => order
                .get()
                .map_or(0, |o| o.len() * std::mem::size_of::<usize>()),
            Layout::Insertion | Layout::Presorted => 0,
        };
        std::mem::size_of::<Self>() + self.entries.len() * std::mem::size_of::<Bytes>() + order
    }
}
