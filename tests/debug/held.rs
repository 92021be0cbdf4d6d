//! Integration tests for the held variable store

use proptest::prelude::*;
use stepwise_debug::HeldVariableStore;
use stepwise_debug::held::INITIAL_HELD_CAPACITY;
use stepwise_foundation::{Heap, Term, TypeInfo};

// =============================================================================
// Add and Lookup
// =============================================================================

#[test]
fn first_add_wins() {
    let mut heap = Heap::new();
    let mut store = HeldVariableStore::new();

    let five = heap.alloc_int(5).unwrap();
    let nine = heap.alloc_int(9).unwrap();

    assert!(store.add("x", &TypeInfo::Int, five, &heap).unwrap());
    assert!(!store.add("x", &TypeInfo::Int, nine, &heap).unwrap());

    let held = store.lookup("x").unwrap();
    assert_eq!(held.type_info, &TypeInfo::Int);
    assert_eq!(held.value, &Term::Int(5));
    assert_eq!(store.len(), 1);
}

#[test]
fn list_is_sorted_regardless_of_insertion_order() {
    let mut store = HeldVariableStore::new();
    for name in ["c", "a", "b"] {
        assert!(store.add_term(name, &TypeInfo::Int, Term::Int(0)).unwrap());
    }
    assert_eq!(store.list().collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(store.render_list(), "$a\n$b\n$c\n");
}

#[test]
fn lookup_on_empty_store() {
    let store = HeldVariableStore::new();
    assert!(store.is_empty());
    assert!(store.lookup("anything").is_none());
    assert!(store.list().next().is_none());
}

// =============================================================================
// Permanence
// =============================================================================

#[test]
fn held_value_outlives_the_frame_that_produced_it() {
    let mut heap = Heap::new();
    let mut store = HeldVariableStore::new();
    let ty = TypeInfo::list(TypeInfo::Int);
    let value = Term::list(vec![Term::Int(1), Term::Int(2)]);

    let frame = heap.mark();
    let word = heap.store(&value).unwrap();
    assert!(store.add("xs", &ty, word, &heap).unwrap());
    heap.reclaim(frame);

    // The freed slots are reused by unrelated data.
    heap.store(&Term::string("garbage")).unwrap();

    let held = store.lookup("xs").unwrap();
    assert_eq!(held.value, &value);
    assert_eq!(held.type_info, &ty);
}

#[test]
fn dangling_handle_leaves_store_unchanged() {
    let mut heap = Heap::new();
    let mut store = HeldVariableStore::new();

    let frame = heap.mark();
    let word = heap.alloc_int(1).unwrap();
    heap.reclaim(frame);

    assert!(store.add("gone", &TypeInfo::Int, word, &heap).is_err());
    assert!(store.is_empty());
    assert_eq!(store.arena().value_count(), 0);
}

#[test]
fn duplicate_does_not_promote() {
    let mut heap = Heap::new();
    let mut store = HeldVariableStore::new();
    let word = heap.alloc_int(1).unwrap();

    store.add("x", &TypeInfo::Int, word, &heap).unwrap();
    store.add("x", &TypeInfo::Int, word, &heap).unwrap();
    assert_eq!(store.arena().value_count(), 1);
}

// =============================================================================
// Growth
// =============================================================================

#[test]
fn capacity_starts_small_and_doubles() {
    let mut store = HeldVariableStore::new();
    assert!(store.capacity() >= INITIAL_HELD_CAPACITY);

    for i in 0..=INITIAL_HELD_CAPACITY {
        store.add_term(&format!("v{i:02}"), &TypeInfo::Int, Term::Int(0)).unwrap();
    }
    assert_eq!(store.len(), INITIAL_HELD_CAPACITY + 1);
    assert!(store.capacity() >= INITIAL_HELD_CAPACITY * 2);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn list_is_strictly_ascending(names in prop::collection::vec("[a-z]{1,4}", 0..40)) {
        let mut store = HeldVariableStore::new();
        for name in &names {
            store.add_term(name, &TypeInfo::Int, Term::Int(0)).unwrap();
        }
        let listed: Vec<&str> = store.list().collect();
        prop_assert!(listed.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn lookup_returns_first_value(pairs in prop::collection::vec(("[a-c]{1,2}", any::<i64>()), 1..30)) {
        let mut store = HeldVariableStore::new();
        for (name, n) in &pairs {
            store.add_term(name, &TypeInfo::Int, Term::Int(*n)).unwrap();
        }
        for (name, _) in &pairs {
            let first = pairs.iter().find(|(k, _)| k == name).map(|(_, n)| *n).unwrap();
            prop_assert_eq!(store.lookup(name).unwrap().value, &Term::Int(first));
        }
    }
}
