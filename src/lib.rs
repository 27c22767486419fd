//! # memrep
//!
//! Interchangeable in-memory table representations for the write buffer of
//! a log-structured storage engine:
//! - Arena-allocated, length-prefixed entries
//! - Concurrent inserts, membership checks and point lookups
//! - Point-in-time iterators that never see later inserts
//! - One-way freeze after which the (lazily sorted) view is shared
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Storage Engine (caller)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Config / name
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      RepFactory                              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ create(comparator, arena)
//!          ┌────────────▼────────────┐
//!          │        TableRep         │──────────┐
//!          │ (Vector / LinkList ...) │          │ allocate
//!          └────────────┬────────────┘          ▼
//!                       │ iter()         ┌─────────────┐
//!                       ▼                │    Arena    │
//!               ┌──────────────┐         │   (bump)    │
//!               │ RepIterator  │         └─────────────┘
//!               │  (Snapshot)  │
//!               └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod arena;
pub mod comparator;
pub mod entry;
pub mod rep;
pub mod factory;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{MemRepError, Result};
pub use config::Config;
pub use arena::{Arena, KeyHandle};
pub use comparator::{InternalKeyComparator, KeyComparator};
pub use entry::{LookupKey, ParsedEntry, ValueType};
pub use factory::{RepFactory, RepKind};
pub use rep::{RepIterator, StatsSnapshot, TableRep};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of memrep
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
