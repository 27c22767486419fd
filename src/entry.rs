//! Entry encoding
//!
//! Defines the byte layout of a buffered entry and of lookup keys.
//!
//! ## Entry Format
//! ```text
//! ┌──────────────┬──────────┬─────────────┬──────────────┬─────────┐
//! │ KeyLen (4)   │ User Key │ Trailer (8) │ ValueLen (4) │  Value  │
//! └──────────────┴──────────┴─────────────┴──────────────┴─────────┘
//!   KeyLen  = user key length + 8 (covers the trailer)
//!   Trailer = (sequence << 8) | value type
//! ```
//! All integers are little-endian. The length-prefixed part (KeyLen, user
//! key, trailer) is the "internal key" that comparators look at; a lookup
//! key is just an internal key with no value section.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::comparator::KeyComparator;
use crate::error::{MemRepError, Result};

/// Largest sequence number that fits in a trailer
pub const MAX_SEQUENCE: u64 = (1 << 56) - 1;

/// Size of the length prefixes
const LEN_SIZE: usize = 4;

/// Size of the packed (sequence, type) trailer
pub const TRAILER_SIZE: usize = 8;

/// Kind of operation an entry records
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Tombstone for the user key
    Deletion = 0,

    /// A live value
    Value = 1,

    /// An operand to be merged with older versions
    Merge = 2,
}

impl ValueType {
    /// Type tag used in lookup keys; sorts before every real entry with the
    /// same sequence number
    pub const FOR_SEEK: u8 = 0xFF;

    pub fn from_u8(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(ValueType::Deletion),
            1 => Ok(ValueType::Value),
            2 => Ok(ValueType::Merge),
            other => Err(MemRepError::Corruption(format!(
                "unknown value type tag {}",
                other
            ))),
        }
    }
}

/// Pack a sequence number and type tag into a trailer
pub fn pack_trailer(sequence: u64, tag: u8) -> u64 {
    assert!(
        sequence <= MAX_SEQUENCE,
        "sequence number {} exceeds 56 bits",
        sequence
    );
    (sequence << 8) | tag as u64
}

/// Number of bytes `encode_into` needs for this key/value pair
pub fn encoded_len(user_key: &[u8], value: &[u8]) -> usize {
    LEN_SIZE + user_key.len() + TRAILER_SIZE + LEN_SIZE + value.len()
}

/// Write an entry into `buf`, which must be exactly `encoded_len` bytes
pub fn encode_into(
    buf: &mut [u8],
    sequence: u64,
    value_type: ValueType,
    user_key: &[u8],
    value: &[u8],
) {
    assert_eq!(
        buf.len(),
        encoded_len(user_key, value),
        "entry buffer has the wrong size"
    );

    let mut out: &mut [u8] = buf;
    out.put_u32_le((user_key.len() + TRAILER_SIZE) as u32);
    out.put_slice(user_key);
    out.put_u64_le(pack_trailer(sequence, value_type as u8));
    out.put_u32_le(value.len() as u32);
    out.put_slice(value);
}

/// Encode a standalone entry (outside of any arena)
pub fn encode_entry(sequence: u64, value_type: ValueType, user_key: &[u8], value: &[u8]) -> Bytes {
    let mut buf = BytesMut::zeroed(encoded_len(user_key, value));
    encode_into(&mut buf, sequence, value_type, user_key, value);
    buf.freeze()
}

/// Encode a key with no value section: `[KeyLen][user_key][trailer]`
fn encode_key(user_key: &[u8], trailer: u64) -> Bytes {
    let mut buf = BytesMut::with_capacity(LEN_SIZE + user_key.len() + TRAILER_SIZE);
    buf.put_u32_le((user_key.len() + TRAILER_SIZE) as u32);
    buf.put_slice(user_key);
    buf.put_u64_le(trailer);
    buf.freeze()
}

/// Seek target positioned before every version of `user_key`
pub fn encode_seek_key(user_key: &[u8]) -> Bytes {
    encode_key(user_key, pack_trailer(MAX_SEQUENCE, ValueType::FOR_SEEK))
}

/// Split the internal key (user key + trailer) out of an encoded entry
pub fn try_internal_key(entry: &[u8]) -> Result<&[u8]> {
    let mut cursor = entry;
    if cursor.remaining() < LEN_SIZE {
        return Err(MemRepError::Corruption(format!(
            "entry of {} bytes has no key length",
            entry.len()
        )));
    }
    let key_len = cursor.get_u32_le() as usize;
    if key_len < TRAILER_SIZE || cursor.remaining() < key_len {
        return Err(MemRepError::Corruption(format!(
            "key length {} does not fit entry of {} bytes",
            key_len,
            entry.len()
        )));
    }
    Ok(&entry[LEN_SIZE..LEN_SIZE + key_len])
}

/// Like `try_internal_key`, for inputs that are known to be well formed
pub fn internal_key(entry: &[u8]) -> &[u8] {
    match try_internal_key(entry) {
        Ok(key) => key,
        Err(e) => panic!("malformed key reached the comparator: {}", e),
    }
}

/// Split an internal key into (user key, trailer)
pub fn split_internal_key(internal_key: &[u8]) -> (&[u8], u64) {
    let (user_key, mut trailer) = internal_key.split_at(internal_key.len() - TRAILER_SIZE);
    (user_key, trailer.get_u64_le())
}

/// Decoded view of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedEntry<'a> {
    pub user_key: &'a [u8],
    pub sequence: u64,
    pub value_type: ValueType,
    pub value: &'a [u8],
}

impl<'a> ParsedEntry<'a> {
    /// Decode an entry produced by `encode_into`
    pub fn parse(entry: &'a [u8]) -> Result<Self> {
        let internal = try_internal_key(entry)?;
        let (user_key, trailer) = split_internal_key(internal);
        let value_type = ValueType::from_u8((trailer & 0xFF) as u8)?;

        let mut rest = &entry[LEN_SIZE + internal.len()..];
        if rest.remaining() < LEN_SIZE {
            return Err(MemRepError::Corruption(
                "entry has no value length".to_string(),
            ));
        }
        let value_len = rest.get_u32_le() as usize;
        if rest.remaining() < value_len {
            return Err(MemRepError::Corruption(format!(
                "value length {} exceeds remaining {} bytes",
                value_len,
                rest.remaining()
            )));
        }

        Ok(Self {
            user_key,
            sequence: trailer >> 8,
            value_type,
            value: &rest[..value_len],
        })
    }
}

/// Point lookup target: a user key read as of a snapshot sequence number
///
/// Under the internal key order (user key ascending, newest first), every
/// version of `user_key` visible at `snapshot` lies between
/// `memtable_key()` and `limit_key()` inclusive.
#[derive(Debug, Clone)]
pub struct LookupKey {
    seek: Bytes,
    limit: Bytes,
}

impl LookupKey {
    pub fn new(user_key: &[u8], snapshot: u64) -> Self {
        Self {
            seek: encode_key(user_key, pack_trailer(snapshot, ValueType::FOR_SEEK)),
            limit: encode_key(user_key, 0),
        }
    }

    /// Lookup for the newest version of `user_key`
    pub fn latest(user_key: &[u8]) -> Self {
        Self::new(user_key, MAX_SEQUENCE)
    }

    /// Seek target for the newest visible version
    pub fn memtable_key(&self) -> &[u8] {
        &self.seek
    }

    /// Key sorting at or after the oldest possible version
    pub fn limit_key(&self) -> &[u8] {
        &self.limit
    }

    pub fn user_key(&self) -> &[u8] {
        &self.seek[LEN_SIZE..self.seek.len() - TRAILER_SIZE]
    }

    /// True iff `entry` is a version of this user key visible at the snapshot
    pub fn matches(&self, cmp: &dyn KeyComparator, entry: &[u8]) -> bool {
        cmp.compare(entry, self.memtable_key()).is_ge()
            && cmp.compare(entry, self.limit_key()).is_le()
    }
}
