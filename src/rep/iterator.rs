//! Representation iterator
//!
//! Cursor over a `Snapshot`. Positions are indexes into the snapshot's
//! iteration order; `None` means the iterator is not pointing at an entry
//! (never positioned, stepped off either end, or a seek found nothing).

use std::sync::Arc;

use bytes::Bytes;

use crate::entry::ParsedEntry;
use crate::error::Result;

use super::snapshot::Snapshot;

/// Iterator over a fixed view of a table representation
///
/// Iterators built while the representation is mutable own a private copy
/// of the entry list and never observe later inserts. Iterators built after
/// `mark_read_only` share the frozen view.
pub struct RepIterator {
    snapshot: Arc<Snapshot>,
    pos: Option<usize>,
}

impl RepIterator {
    pub(crate) fn new(snapshot: Arc<Snapshot>) -> Self {
        Self {
            snapshot,
            pos: None,
        }
    }

    /// True iff positioned at an entry
    pub fn valid(&self) -> bool {
        self.snapshot.ensure_sorted();
        self.pos.is_some()
    }

    /// Encoded entry at the current position
    ///
    /// # Panics
    /// If the iterator is not `valid()`.
    pub fn key(&self) -> &[u8] {
        match self.pos {
            Some(pos) => &self.snapshot.at(pos)[..],
            None => panic!("key() called on an invalid iterator"),
        }
    }

    /// Decoded entry at the current position
    ///
    /// # Panics
    /// If the iterator is not `valid()`.
    pub fn entry(&self) -> Result<ParsedEntry<'_>> {
        ParsedEntry::parse(self.key())
    }

    /// Step forward; stepping past the last entry invalidates
    pub fn next(&mut self) {
        if let Some(pos) = self.pos {
            self.pos = Some(pos + 1).filter(|&p| p < self.snapshot.len());
        }
    }

    /// Step backward; stepping before the first entry invalidates
    pub fn prev(&mut self) {
        if let Some(pos) = self.pos {
            self.pos = pos.checked_sub(1);
        }
    }

    /// Position at the first entry >= `target`
    ///
    /// Ordered snapshots binary search. Insertion-ordered snapshots scan
    /// linearly and stop at the first entry (in insertion order) that
    /// satisfies the predicate.
    pub fn seek(&mut self, target: &[u8]) {
        let pos = if self.snapshot.is_ordered() {
            self.snapshot.lower_bound(target)
        } else {
            self.snapshot.find_at_or_after(target)
        };
        self.pos = Some(pos).filter(|&p| p < self.snapshot.len());
    }

    /// Position at the last entry <= `target`
    ///
    /// # Panics
    /// On insertion-ordered snapshots, where "last entry <= target" has no
    /// meaningful answer.
    pub fn seek_for_prev(&mut self, target: &[u8]) {
        assert!(
            self.snapshot.is_ordered(),
            "seek_for_prev is not supported by insertion-ordered iterators"
        );
        self.pos = self.snapshot.upper_bound(target).checked_sub(1);
    }

    pub fn seek_to_first(&mut self) {
        self.snapshot.ensure_sorted();
        self.pos = Some(0).filter(|&p| p < self.snapshot.len());
    }

    pub fn seek_to_last(&mut self) {
        self.snapshot.ensure_sorted();
        self.pos = self.snapshot.len().checked_sub(1);
    }

    /// Number of entries in the underlying view
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.len() == 0
    }

    /// Whether this iterator walks comparator order
    pub fn is_ordered(&self) -> bool {
        self.snapshot.is_ordered()
    }

    /// Whether two iterators walk the very same view
    pub fn shares_view_with(&self, other: &RepIterator) -> bool {
        Arc::ptr_eq(&self.snapshot, &other.snapshot)
    }

    fn current(&self) -> Option<&Bytes> {
        self.pos.map(|pos| self.snapshot.at(pos))
    }

    /// Forward scan from the first entry, for flush-style consumers
    pub fn into_entries(self) -> Entries {
        Entries {
            iter: self,
            started: false,
        }
    }
}

/// `std::iter::Iterator` adapter returned by `RepIterator::into_entries`
pub struct Entries {
    iter: RepIterator,
    started: bool,
}

impl Iterator for Entries {
    type Item = Bytes;

    fn next(&mut self) -> Option<Self::Item> {
        if self.started {
            self.iter.next();
        } else {
            self.iter.seek_to_first();
            self.started = true;
        }
        self.iter.current().cloned()
    }
}
