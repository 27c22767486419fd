//! Table Representation Module
//!
//! The in-memory staging structures that buffer recent writes until the
//! engine flushes them.
//!
//! ## Responsibilities
//! - Accept concurrent inserts of arena-allocated entries
//! - Answer membership and point lookups while inserts continue
//! - Hand out iterators over consistent point-in-time views
//! - Switch once from mutable to read-only, after which reads need no
//!   writer locking
//!
//! ## Variants
//! ```text
//! ┌─────────────────────┬──────────────┬────────────────────────┬───────────┐
//! │ Variant             │ Backing      │ Order                  │ Lock      │
//! ├─────────────────────┼──────────────┼────────────────────────┼───────────┤
//! │ Vector              │ Vec          │ sorted once, on freeze │ RwLock    │
//! │ NeverSortedVector   │ Vec          │ insertion, always      │ RwLock    │
//! │ SortedVector        │ Vec          │ sorted on every insert │ RwLock    │
//! │ LinkList            │ linked nodes │ sorted per iterator    │ RwLock    │
//! │ SerialLinkList      │ linked nodes │ sorted per iterator    │ Mutex     │
//! └─────────────────────┴──────────────┴────────────────────────┴───────────┘
//! ```

mod iterator;
mod linklist;
mod never_sorted;
mod node_list;
mod serial_linklist;
mod snapshot;
mod sorted_vector;
mod stats;
mod vec_store;
mod vector;

pub use iterator::{Entries, RepIterator};
pub use linklist::LinkListRep;
pub use never_sorted::NeverSortedVectorRep;
pub use serial_linklist::SerialLinkListRep;
pub use sorted_vector::SortedVectorRep;
pub use stats::{RepStats, StatsSnapshot};
pub use vector::VectorRep;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::arena::{Arena, KeyHandle};
use crate::comparator::KeyComparator;
use crate::entry::{self, LookupKey, ValueType};
use crate::factory::RepKind;

use snapshot::{Layout, Snapshot};

/// Source of representation ids (used to reject foreign key handles)
static NEXT_REP_ID: AtomicU64 = AtomicU64::new(1);

/// State every variant carries
pub(crate) struct RepCore {
    id: u64,
    arena: Arc<Arena>,
    cmp: Arc<dyn KeyComparator>,
    stats: Arc<RepStats>,
}

impl RepCore {
    fn new(cmp: Arc<dyn KeyComparator>, arena: Arc<Arena>) -> Self {
        Self {
            id: NEXT_REP_ID.fetch_add(1, Ordering::Relaxed),
            arena,
            cmp,
            stats: Arc::new(RepStats::default()),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn comparator(&self) -> &dyn KeyComparator {
        self.cmp.as_ref()
    }

    pub(crate) fn stats(&self) -> &RepStats {
        &self.stats
    }

    fn allocate(&self, len: usize) -> KeyHandle {
        KeyHandle::new(self.arena.allocate_aligned(len), self.id)
    }

    /// Take ownership of a filled handle
    ///
    /// # Panics
    /// If the handle was allocated by a different representation.
    pub(crate) fn claim(&self, handle: KeyHandle) -> Bytes {
        assert_eq!(
            handle.owner(),
            self.id,
            "key handle was allocated by a different table representation"
        );
        handle.into_entry()
    }

    pub(crate) fn snapshot(&self, entries: Arc<[Bytes]>, layout: Layout) -> Snapshot {
        Snapshot::new(entries, layout, Arc::clone(&self.cmp), Arc::clone(&self.stats))
    }
}

macro_rules! dispatch {
    ($self:expr, $rep:ident => $body:expr) => {
        match $self {
            TableRep::Vector($rep) => $body,
            TableRep::NeverSortedVector($rep) => $body,
            TableRep::SortedVector($rep) => $body,
            TableRep::LinkList($rep) => $body,
            TableRep::SerialLinkList($rep) => $body,
        }
    };
}

/// A table representation: one of the closed set of variants
///
/// ## Lifecycle
/// 1. Created by `RepFactory` with an expected entry count
/// 2. Mutable: `allocate` + `insert`, concurrent with `contains`/`get`/`iter`
/// 3. `mark_read_only` exactly once
/// 4. Read-only: iterators feed the flush; inserts panic
///
/// All methods take `&self`; share across threads with `Arc<TableRep>`.
pub enum TableRep {
    Vector(VectorRep),
    NeverSortedVector(NeverSortedVectorRep),
    SortedVector(SortedVectorRep),
    LinkList(LinkListRep),
    SerialLinkList(SerialLinkListRep),
}

impl TableRep {
    /// Build a representation of `kind` over `arena`
    pub fn new(
        kind: RepKind,
        cmp: Arc<dyn KeyComparator>,
        arena: Arc<Arena>,
        expected_entries: usize,
    ) -> Self {
        let core = RepCore::new(cmp, arena);
        debug!(
            rep = core.id(),
            kind = %kind,
            comparator = core.comparator().name(),
            expected_entries,
            "created table representation"
        );

        match kind {
            RepKind::Vector => TableRep::Vector(VectorRep::new(core, expected_entries)),
            RepKind::NeverSortedVector => {
                TableRep::NeverSortedVector(NeverSortedVectorRep::new(core, expected_entries))
            }
            RepKind::SortedVector => {
                TableRep::SortedVector(SortedVectorRep::new(core, expected_entries))
            }
            RepKind::LinkList => TableRep::LinkList(LinkListRep::new(core, expected_entries)),
            RepKind::SerialLinkList => {
                TableRep::SerialLinkList(SerialLinkListRep::new(core, expected_entries))
            }
        }
    }

    pub fn kind(&self) -> RepKind {
        match self {
            TableRep::Vector(_) => RepKind::Vector,
            TableRep::NeverSortedVector(_) => RepKind::NeverSortedVector,
            TableRep::SortedVector(_) => RepKind::SortedVector,
            TableRep::LinkList(_) => RepKind::LinkList,
            TableRep::SerialLinkList(_) => RepKind::SerialLinkList,
        }
    }

    fn core(&self) -> &RepCore {
        dispatch!(self, rep => rep.core())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Reserve `len` bytes for one entry from this representation's arena
    pub fn allocate(&self, len: usize) -> KeyHandle {
        self.core().allocate(len)
    }

    /// Append a filled entry
    ///
    /// # Panics
    /// If the representation is read-only, or `handle` came from another
    /// representation.
    pub fn insert(&self, handle: KeyHandle) {
        let start = Instant::now();
        dispatch!(self, rep => rep.insert(handle));

        let core = self.core();
        core.stats().record_insert();
        trace!(
            rep = core.id(),
            elapsed_ns = start.elapsed().as_nanos() as u64,
            "insert"
        );
    }

    /// Allocate, encode and insert one entry
    pub fn insert_entry(&self, sequence: u64, value_type: ValueType, user_key: &[u8], value: &[u8]) {
        let mut handle = self.allocate(entry::encoded_len(user_key, value));
        entry::encode_into(handle.buf_mut(), sequence, value_type, user_key, value);
        self.insert(handle);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// True iff an entry comparing equal to `key` is stored
    pub fn contains(&self, key: &[u8]) -> bool {
        dispatch!(self, rep => rep.contains(key))
    }

    /// Feed entries matching `lookup` to `callback` in the variant's
    /// priority order
    ///
    /// `callback` returns whether it wants the next entry. The serial
    /// linked list only ever surfaces the newest match.
    pub fn get<F>(&self, lookup: &LookupKey, mut callback: F)
    where
        F: FnMut(&[u8]) -> bool,
    {
        let start = Instant::now();
        dispatch!(self, rep => rep.get(lookup, &mut callback));

        let core = self.core();
        core.stats().record_lookup();
        trace!(
            rep = core.id(),
            elapsed_ns = start.elapsed().as_nanos() as u64,
            "point lookup"
        );
    }

    /// Iterator over a consistent view of the current entries
    pub fn iter(&self) -> RepIterator {
        dispatch!(self, rep => rep.iter())
    }

    pub fn len(&self) -> usize {
        dispatch!(self, rep => rep.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Switch to read-only
    ///
    /// # Panics
    /// If called more than once.
    pub fn mark_read_only(&self) {
        dispatch!(self, rep => rep.mark_read_only())
    }

    pub fn is_read_only(&self) -> bool {
        dispatch!(self, rep => rep.is_read_only())
    }

    // =========================================================================
    // Accounting
    // =========================================================================

    /// Rough bytes used by the index structure (entries live in the arena)
    pub fn approximate_memory_usage(&self) -> usize {
        dispatch!(self, rep => rep.approximate_memory_usage())
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.core().stats().snapshot()
    }

    pub fn arena(&self) -> &Arc<Arena> {
        &self.core().arena
    }

    pub fn comparator(&self) -> &dyn KeyComparator {
        self.core().comparator()
    }
}
