//! Key comparators
//!
//! Representations treat ordering as a black box: a three-way comparison
//! over encoded entries. `InternalKeyComparator` is the order used by the
//! entry encoding in `crate::entry`.

use std::cmp::Ordering;

use crate::entry;

/// Total order over encoded entries / lookup keys
pub trait KeyComparator: Send + Sync {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;

    /// Name reported in logs
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> KeyComparator for F
where
    F: Fn(&[u8], &[u8]) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        self(a, b)
    }
}

/// User key ascending (bytewise), then sequence/type descending
///
/// Newer versions of the same user key sort first, so a forward seek lands
/// on the most recent visible version.
#[derive(Debug, Default, Clone, Copy)]
pub struct InternalKeyComparator;

impl KeyComparator for InternalKeyComparator {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        let (user_a, trailer_a) = entry::split_internal_key(entry::internal_key(a));
        let (user_b, trailer_b) = entry::split_internal_key(entry::internal_key(b));

        user_a
            .cmp(user_b)
            .then_with(|| trailer_b.cmp(&trailer_a))
    }

    fn name(&self) -> &str {
        "internal-key"
    }
}
