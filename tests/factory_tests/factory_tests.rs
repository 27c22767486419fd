//! Factory and Config Tests
//!
//! Tests verify:
//! - Name lookup (short names, factory names, case and separators)
//! - Unknown names are reported as errors
//! - Config builder defaults and validation
//! - Factories build the configured variant

use std::sync::Arc;

use memrep::{Arena, Config, InternalKeyComparator, MemRepError, RepFactory, RepKind};

// =============================================================================
// Name Lookup Tests
// =============================================================================

#[test]
fn test_short_names_round_trip() {
    for kind in RepKind::ALL {
        assert_eq!(kind.name().parse::<RepKind>().unwrap(), kind);
        assert_eq!(kind.to_string(), kind.name());
    }
}

#[test]
fn test_factory_names_are_accepted() {
    assert_eq!("VectorRepFactory".parse::<RepKind>().unwrap(), RepKind::Vector);
    assert_eq!(
        "NeverSortedVectorRepFactory".parse::<RepKind>().unwrap(),
        RepKind::NeverSortedVector
    );
    assert_eq!(
        "SerialLinkListRepFactory".parse::<RepKind>().unwrap(),
        RepKind::SerialLinkList
    );
}

#[test]
fn test_name_lookup_is_lenient() {
    assert_eq!("LinkList".parse::<RepKind>().unwrap(), RepKind::LinkList);
    assert_eq!("sorted-vector".parse::<RepKind>().unwrap(), RepKind::SortedVector);
    assert_eq!("  VECTOR ".parse::<RepKind>().unwrap(), RepKind::Vector);
}

#[test]
fn test_unknown_name_is_error() {
    let err = "skiplist".parse::<RepKind>().unwrap_err();
    assert_eq!(err, MemRepError::UnknownRep("skiplist".to_string()));
    assert_eq!(err.to_string(), "Unknown table representation: skiplist");

    assert!(RepFactory::from_name("", 0).is_err());
}

#[test]
fn test_only_never_sorted_is_unordered() {
    let unordered: Vec<RepKind> = RepKind::ALL.into_iter().filter(|k| !k.is_ordered()).collect();
    assert_eq!(unordered, vec![RepKind::NeverSortedVector]);
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.rep_kind, RepKind::Vector);
    assert_eq!(config.expected_entries, 0);
    assert_eq!(config.arena_block_size, 4 * 1024 * 1024);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_builder() {
    let config = Config::builder()
        .rep_kind(RepKind::LinkList)
        .expected_entries(500)
        .arena_block_size(8192)
        .build()
        .unwrap();

    assert_eq!(config.rep_kind, RepKind::LinkList);
    assert_eq!(config.expected_entries, 500);
    assert_eq!(config.arena_block_size, 8192);
}

#[test]
fn test_config_builder_by_name() {
    let config = Config::builder()
        .rep_name("never_sorted_vector")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.rep_kind, RepKind::NeverSortedVector);

    assert!(matches!(
        Config::builder().rep_name("btree"),
        Err(MemRepError::UnknownRep(_))
    ));
}

#[test]
fn test_zero_block_size_rejected() {
    let result = Config::builder().arena_block_size(0).build();
    assert!(matches!(result, Err(MemRepError::Config(_))));

    let config = Config {
        arena_block_size: 0,
        ..Config::default()
    };
    assert!(RepFactory::from_config(&config).is_err());
}

// =============================================================================
// Factory Tests
// =============================================================================

#[test]
fn test_factory_builds_configured_kind() {
    for kind in RepKind::ALL {
        let config = Config::builder()
            .rep_kind(kind)
            .arena_block_size(1024)
            .build()
            .unwrap();
        let factory = RepFactory::from_config(&config).unwrap();
        assert_eq!(factory.kind(), kind);
        assert_eq!(factory.name(), kind.factory_name());

        let rep = factory.create_with_new_arena(Arc::new(InternalKeyComparator));
        assert_eq!(rep.kind(), kind);
        assert_eq!(rep.arena().block_size(), 1024);
    }
}

#[test]
fn test_factory_from_name() {
    let factory = RepFactory::from_name("linklist", 64).unwrap();
    assert_eq!(factory.kind(), RepKind::LinkList);
    assert_eq!(factory.expected_entries(), 64);
}

#[test]
fn test_reps_can_share_an_arena() {
    let arena = Arc::new(Arena::new(4096));
    let factory = RepFactory::new(RepKind::SortedVector, 0);
    let a = factory.create(Arc::new(InternalKeyComparator), Arc::clone(&arena));
    let b = factory.create(Arc::new(InternalKeyComparator), Arc::clone(&arena));

    a.insert_entry(1, memrep::ValueType::Value, b"a", b"1");
    b.insert_entry(1, memrep::ValueType::Value, b"b", b"2");

    assert!(Arc::ptr_eq(a.arena(), b.arena()));
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert!(arena.allocated_bytes() > 0);
}
