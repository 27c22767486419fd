//! Per-representation instrumentation
//!
//! Counters for the work a representation does on behalf of readers:
//! how many private snapshots were copied, how many sort passes ran, and
//! how long both took. Shared by every snapshot and iterator the
//! representation hands out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam::utils::CachePadded;

/// Live counters (all relaxed atomics)
#[derive(Debug, Default)]
pub struct RepStats {
    inserts: CachePadded<AtomicU64>,
    point_lookups: CachePadded<AtomicU64>,
    snapshots: AtomicU64,
    snapshot_nanos: AtomicU64,
    sorts: AtomicU64,
    sort_nanos: AtomicU64,
}

impl RepStats {
    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_lookup(&self) {
        self.point_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_snapshot(&self, elapsed: Duration) {
        self.snapshots.fetch_add(1, Ordering::Relaxed);
        self.snapshot_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_sort(&self, elapsed: Duration) {
        self.sorts.fetch_add(1, Ordering::Relaxed);
        self.sort_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            point_lookups: self.point_lookups.load(Ordering::Relaxed),
            snapshots_created: self.snapshots.load(Ordering::Relaxed),
            snapshot_time: Duration::from_nanos(self.snapshot_nanos.load(Ordering::Relaxed)),
            sorts: self.sorts.load(Ordering::Relaxed),
            sort_time: Duration::from_nanos(self.sort_nanos.load(Ordering::Relaxed)),
        }
    }
}

/// Copy of `RepStats` at one moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub inserts: u64,
    pub point_lookups: u64,
    /// Private copies taken for readers of a mutable representation
    pub snapshots_created: u64,
    pub snapshot_time: Duration,
    /// Sort passes performed (shared or private)
    pub sorts: u64,
    pub sort_time: Duration,
}
