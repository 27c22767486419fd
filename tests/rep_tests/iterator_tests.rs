//! RepIterator Tests
//!
//! Tests verify:
//! - Seek / SeekForPrev positioning on ordered views
//! - Linear seek on insertion-ordered views
//! - Forward and backward traversal agree
//! - Edge behavior at both ends and on invalid iterators

use std::sync::Arc;

use memrep::entry::{encode_entry, encode_seek_key};
use memrep::{
    InternalKeyComparator, LookupKey, ParsedEntry, RepFactory, RepIterator, RepKind, TableRep,
    ValueType,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn frozen_rep(kind: RepKind, keys: &[u64]) -> TableRep {
    let rep = RepFactory::new(kind, keys.len()).create_with_new_arena(Arc::new(InternalKeyComparator));
    for (i, key) in keys.iter().enumerate() {
        rep.insert_entry(i as u64 + 1, ValueType::Value, &key.to_be_bytes(), b"v");
    }
    rep.mark_read_only();
    rep
}

fn seek_key(key: u64) -> bytes::Bytes {
    encode_seek_key(&key.to_be_bytes())
}

fn current(iter: &RepIterator) -> u64 {
    let parsed = iter.entry().unwrap();
    u64::from_be_bytes(parsed.user_key.try_into().unwrap())
}

fn ordered_kinds() -> impl Iterator<Item = RepKind> {
    RepKind::ALL.into_iter().filter(|k| k.is_ordered())
}

// =============================================================================
// Seek Tests
// =============================================================================

#[test]
fn test_seek_lands_on_next_key() {
    for kind in ordered_kinds() {
        let rep = frozen_rep(kind, &[7, 1, 5, 3]);
        let mut iter = rep.iter();

        iter.seek(&seek_key(4));
        assert!(iter.valid(), "{}", kind);
        assert_eq!(current(&iter), 5, "{}", kind);

        iter.seek(&seek_key(5));
        assert_eq!(current(&iter), 5, "{}", kind);

        iter.seek(&seek_key(0));
        assert_eq!(current(&iter), 1, "{}", kind);
    }
}

#[test]
fn test_seek_past_end_is_invalid() {
    for kind in ordered_kinds() {
        let rep = frozen_rep(kind, &[1, 3, 5, 7]);
        let mut iter = rep.iter();

        iter.seek(&seek_key(8));
        assert!(!iter.valid(), "{}", kind);
    }
}

#[test]
fn test_seek_for_prev_lands_on_previous_key() {
    for kind in ordered_kinds() {
        let rep = frozen_rep(kind, &[1, 3, 5, 7]);
        let mut iter = rep.iter();

        iter.seek_for_prev(&seek_key(4));
        assert!(iter.valid(), "{}", kind);
        assert_eq!(current(&iter), 3, "{}", kind);

        // The limit key sorts after every version of 5
        iter.seek_for_prev(LookupKey::latest(&5u64.to_be_bytes()).limit_key());
        assert_eq!(current(&iter), 5, "{}", kind);

        iter.seek_for_prev(&seek_key(100));
        assert_eq!(current(&iter), 7, "{}", kind);
    }
}

#[test]
fn test_seek_for_prev_before_start_is_invalid() {
    for kind in ordered_kinds() {
        let rep = frozen_rep(kind, &[1, 3, 5, 7]);
        let mut iter = rep.iter();

        iter.seek_for_prev(&seek_key(0));
        assert!(!iter.valid(), "{}", kind);
    }
}

#[test]
fn test_seek_exact_entry() {
    for kind in ordered_kinds() {
        let rep = frozen_rep(kind, &[2, 4, 6]);
        let target = encode_entry(2, ValueType::Value, &4u64.to_be_bytes(), b"v");
        let mut iter = rep.iter();

        iter.seek(&target);
        assert_eq!(iter.key(), &target[..], "{}", kind);

        iter.seek_for_prev(&target);
        assert_eq!(iter.key(), &target[..], "{}", kind);
    }
}

#[test]
fn test_seek_on_mutable_view() {
    for kind in ordered_kinds() {
        let rep = RepFactory::new(kind, 0).create_with_new_arena(Arc::new(InternalKeyComparator));
        for (i, key) in [30u64, 10, 20].iter().enumerate() {
            rep.insert_entry(i as u64 + 1, ValueType::Value, &key.to_be_bytes(), b"v");
        }

        let mut iter = rep.iter();
        iter.seek(&seek_key(15));
        assert_eq!(current(&iter), 20, "{}", kind);
    }
}

// =============================================================================
// Insertion-Ordered Iterator Tests
// =============================================================================

#[test]
fn test_never_sorted_seek_is_linear() {
    let rep = frozen_rep(RepKind::NeverSortedVector, &[1, 9, 4, 6]);
    let mut iter = rep.iter();

    // First entry in insertion order that is >= 4
    iter.seek(&seek_key(4));
    assert_eq!(current(&iter), 9);

    iter.seek(&seek_key(10));
    assert!(!iter.valid());
}

#[test]
#[should_panic(expected = "seek_for_prev")]
fn test_never_sorted_seek_for_prev_panics() {
    let rep = frozen_rep(RepKind::NeverSortedVector, &[1, 2]);
    let mut iter = rep.iter();
    iter.seek_for_prev(&seek_key(1));
}

#[test]
fn test_never_sorted_walks_both_ways() {
    let rep = frozen_rep(RepKind::NeverSortedVector, &[3, 1, 2]);
    let mut iter = rep.iter();

    iter.seek_to_last();
    let mut backward = Vec::new();
    while iter.valid() {
        backward.push(current(&iter));
        iter.prev();
    }
    assert_eq!(backward, vec![2, 1, 3]);
}

// =============================================================================
// Traversal Tests
// =============================================================================

#[test]
fn test_forward_and_backward_agree() {
    for kind in RepKind::ALL {
        let rep = frozen_rep(kind, &[8, 2, 6, 4, 10]);
        let mut iter = rep.iter();

        let mut forward = Vec::new();
        iter.seek_to_first();
        while iter.valid() {
            forward.push(current(&iter));
            iter.next();
        }

        let mut backward = Vec::new();
        iter.seek_to_last();
        while iter.valid() {
            backward.push(current(&iter));
            iter.prev();
        }
        backward.reverse();

        assert_eq!(forward, backward, "{}", kind);
        assert_eq!(forward.len(), 5);
    }
}

#[test]
fn test_next_then_prev_returns_to_same_entry() {
    for kind in RepKind::ALL {
        let rep = frozen_rep(kind, &[5, 3, 1]);
        let mut iter = rep.iter();
        iter.seek_to_first();

        let first = iter.key().to_vec();
        iter.next();
        iter.prev();
        assert_eq!(iter.key(), &first[..], "{}", kind);
    }
}

#[test]
fn test_stepping_off_either_end_invalidates() {
    for kind in RepKind::ALL {
        let rep = frozen_rep(kind, &[1, 2]);
        let mut iter = rep.iter();

        iter.seek_to_first();
        iter.prev();
        assert!(!iter.valid(), "{}", kind);

        iter.seek_to_last();
        iter.next();
        assert!(!iter.valid(), "{}", kind);
    }
}

#[test]
fn test_next_and_prev_on_invalid_iterator_are_noops() {
    for kind in RepKind::ALL {
        let rep = frozen_rep(kind, &[1, 2]);
        let mut iter = rep.iter();

        assert!(!iter.valid());
        iter.next();
        assert!(!iter.valid(), "{}", kind);
        iter.prev();
        assert!(!iter.valid(), "{}", kind);
    }
}

#[test]
#[should_panic(expected = "invalid iterator")]
fn test_key_on_invalid_iterator_panics() {
    let rep = frozen_rep(RepKind::Vector, &[1]);
    let iter = rep.iter();
    let _ = iter.key();
}

#[test]
fn test_iterator_length() {
    for kind in RepKind::ALL {
        let rep = frozen_rep(kind, &[1, 2, 3]);
        let iter = rep.iter();
        assert_eq!(iter.len(), 3);
        assert!(!iter.is_empty());
    }
}

// =============================================================================
// Entries Adapter Tests
// =============================================================================

#[test]
fn test_into_entries_scans_in_order() {
    let rep = frozen_rep(RepKind::LinkList, &[4, 2, 3, 1]);
    let keys: Vec<u64> = rep
        .iter()
        .into_entries()
        .map(|e| {
            let parsed = ParsedEntry::parse(&e).unwrap();
            u64::from_be_bytes(parsed.user_key.try_into().unwrap())
        })
        .collect();
    assert_eq!(keys, vec![1, 2, 3, 4]);
}

#[test]
fn test_into_entries_on_empty_rep() {
    let rep = frozen_rep(RepKind::SerialLinkList, &[]);
    assert_eq!(rep.iter().into_entries().count(), 0);
}

#[test]
fn test_entry_decodes_value() {
    let rep = RepFactory::new(RepKind::Vector, 0).create_with_new_arena(Arc::new(InternalKeyComparator));
    rep.insert_entry(9, ValueType::Deletion, b"gone", b"");
    rep.insert_entry(10, ValueType::Merge, b"counter", b"+1");

    let mut iter = rep.iter();
    iter.seek_to_first();
    let entry = iter.entry().unwrap();
    assert_eq!(entry.user_key, b"counter");
    assert_eq!(entry.sequence, 10);
    assert_eq!(entry.value_type, ValueType::Merge);
    assert_eq!(entry.value, b"+1");

    iter.next();
    let entry = iter.entry().unwrap();
    assert_eq!(entry.user_key, b"gone");
    assert_eq!(entry.value_type, ValueType::Deletion);
}
