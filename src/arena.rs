//! Arena Module
//!
//! Aligned bump allocator backing every entry of a table representation.
//!
//! ## Responsibilities
//! - Hand out writable regions carved from large shared blocks
//! - Never free individual entries (memory goes away with the last view)
//! - Track reserved vs. handed-out bytes for flush heuristics
//!
//! ## Block Layout
//! ```text
//! ┌──────────────────────── block (block_size) ────────────────────────┐
//! │ entry 0 (8-aligned) │ entry 1 (8-aligned) │ ... │   unused tail    │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//! Requests larger than a quarter block get a dedicated allocation so a
//! single large entry does not waste the tail of the current block.

use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;

/// Alignment of every region handed out by the arena
pub const ALIGNMENT: usize = 8;

/// Bump allocator over `BytesMut` blocks
pub struct Arena {
    block_size: usize,

    /// Unused tail of the current block
    current: Mutex<BytesMut>,

    /// Bytes reserved from the system (whole blocks + dedicated regions)
    memory_usage: AtomicUsize,

    /// Bytes handed out to callers (after alignment)
    allocated: AtomicUsize,
}

impl Arena {
    /// Create an arena that reserves memory `block_size` bytes at a time
    pub fn new(block_size: usize) -> Self {
        assert!(block_size > 0, "arena block size must be non-zero");
        Self {
            block_size,
            current: Mutex::new(BytesMut::new()),
            memory_usage: AtomicUsize::new(0),
            allocated: AtomicUsize::new(0),
        }
    }

    /// Reserve a zeroed, writable region of exactly `len` bytes
    pub fn allocate_aligned(&self, len: usize) -> BytesMut {
        let rounded = len.next_multiple_of(ALIGNMENT);
        self.allocated.fetch_add(rounded, Ordering::Relaxed);

        if rounded > self.block_size / 4 {
            self.memory_usage.fetch_add(rounded, Ordering::Relaxed);
            return BytesMut::zeroed(len);
        }

        let mut current = self.current.lock();
        if current.len() < rounded {
            *current = BytesMut::zeroed(self.block_size);
            self.memory_usage
                .fetch_add(self.block_size, Ordering::Relaxed);
        }

        let mut region = current.split_to(rounded);
        region.truncate(len);
        region
    }

    /// Bytes reserved from the system so far
    pub fn memory_usage(&self) -> usize {
        self.memory_usage.load(Ordering::Relaxed)
    }

    /// Bytes handed out to callers so far (including alignment padding)
    pub fn allocated_bytes(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }

    /// Configured block size
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

/// A region reserved for one entry, not yet inserted
///
/// Returned by `TableRep::allocate`. The caller fills `buf_mut()` and hands
/// the handle back through `TableRep::insert`, which takes ownership. A
/// handle remembers which representation created it; inserting it anywhere
/// else panics.
#[derive(Debug)]
pub struct KeyHandle {
    buf: BytesMut,
    owner: u64,
}

impl KeyHandle {
    pub(crate) fn new(buf: BytesMut, owner: u64) -> Self {
        Self { buf, owner }
    }

    /// Writable view of the reserved region
    pub fn buf_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..]
    }

    /// Read-only view of the reserved region
    pub fn buf(&self) -> &[u8] {
        &self.buf[..]
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Id of the representation that reserved this region
    pub(crate) fn owner(&self) -> u64 {
        self.owner
    }

    /// Freeze into the immutable entry view stored by representations
    pub(crate) fn into_entry(self) -> Bytes {
        self.buf.freeze()
    }
}
