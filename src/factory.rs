//! Representation factory
//!
//! Maps configuration names to representation variants and builds them.
//!
//! ## Registered Names
//! ```text
//! vector               VectorRepFactory              sort-on-freeze vector
//! never_sorted_vector  NeverSortedVectorRepFactory   insertion-ordered vector
//! sorted_vector        SortedVectorRepFactory        always-sorted vector
//! linklist             LinkListRepFactory            RwLock linked list
//! serial_linklist      SerialLinkListRepFactory      Mutex linked list
//! ```
//! Lookup is case-insensitive and treats `-` like `_`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::arena::Arena;
use crate::comparator::KeyComparator;
use crate::config::Config;
use crate::error::{MemRepError, Result};
use crate::rep::TableRep;

/// Representation variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepKind {
    Vector,
    NeverSortedVector,
    SortedVector,
    LinkList,
    SerialLinkList,
}

impl RepKind {
    /// Every registered variant
    pub const ALL: [RepKind; 5] = [
        RepKind::Vector,
        RepKind::NeverSortedVector,
        RepKind::SortedVector,
        RepKind::LinkList,
        RepKind::SerialLinkList,
    ];

    /// Short configuration name
    pub fn name(&self) -> &'static str {
        match self {
            RepKind::Vector => "vector",
            RepKind::NeverSortedVector => "never_sorted_vector",
            RepKind::SortedVector => "sorted_vector",
            RepKind::LinkList => "linklist",
            RepKind::SerialLinkList => "serial_linklist",
        }
    }

    /// Factory-style name, also accepted by `from_str`
    pub fn factory_name(&self) -> &'static str {
        match self {
            RepKind::Vector => "VectorRepFactory",
            RepKind::NeverSortedVector => "NeverSortedVectorRepFactory",
            RepKind::SortedVector => "SortedVectorRepFactory",
            RepKind::LinkList => "LinkListRepFactory",
            RepKind::SerialLinkList => "SerialLinkListRepFactory",
        }
    }

    /// Whether iterators walk comparator order (and support seek_for_prev)
    pub fn is_ordered(&self) -> bool {
        !matches!(self, RepKind::NeverSortedVector)
    }
}

impl fmt::Display for RepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RepKind {
    type Err = MemRepError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace('-', "_");
        RepKind::ALL
            .into_iter()
            .find(|kind| {
                kind.name().eq_ignore_ascii_case(&wanted)
                    || kind.factory_name().eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| MemRepError::UnknownRep(s.to_string()))
    }
}

/// Builds table representations of one configured variant
#[derive(Debug, Clone)]
pub struct RepFactory {
    kind: RepKind,
    expected_entries: usize,
    arena_block_size: usize,
}

impl RepFactory {
    pub fn new(kind: RepKind, expected_entries: usize) -> Self {
        Self {
            kind,
            expected_entries,
            arena_block_size: Config::default().arena_block_size,
        }
    }

    /// Look a variant up by its registered name
    pub fn from_name(name: &str, expected_entries: usize) -> Result<Self> {
        Ok(Self::new(name.parse()?, expected_entries))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            kind: config.rep_kind,
            expected_entries: config.expected_entries,
            arena_block_size: config.arena_block_size,
        })
    }

    pub fn kind(&self) -> RepKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.factory_name()
    }

    pub fn expected_entries(&self) -> usize {
        self.expected_entries
    }

    /// Build a representation over a caller-supplied arena
    pub fn create(&self, cmp: Arc<dyn KeyComparator>, arena: Arc<Arena>) -> TableRep {
        TableRep::new(self.kind, cmp, arena, self.expected_entries)
    }

    /// Build a representation with a fresh arena of the configured block size
    pub fn create_with_new_arena(&self, cmp: Arc<dyn KeyComparator>) -> TableRep {
        self.create(cmp, Arc::new(Arena::new(self.arena_block_size)))
    }
}
