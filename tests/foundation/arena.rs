//! Integration tests for the permanent arena
//!
//! Tests that promoted values outlive heap reclamation and that type
//! descriptors are interned.

use stepwise_foundation::{Heap, PermanentArena, Term, TypeInfo};

#[test]
fn promoted_value_survives_reclaim() {
    let mut heap = Heap::new();
    let mut arena = PermanentArena::new();

    let mark = heap.mark();
    let word = heap.store(&Term::string("frame-local")).unwrap();
    let id = arena.promote_value(&heap, word).unwrap();
    heap.reclaim(mark);

    assert!(!heap.is_live(word));
    assert_eq!(arena.value(id), &Term::string("frame-local"));
}

#[test]
fn promoting_dangling_word_fails_without_growth() {
    let mut heap = Heap::new();
    let mut arena = PermanentArena::new();

    let mark = heap.mark();
    let word = heap.alloc_int(3).unwrap();
    heap.reclaim(mark);

    assert!(arena.promote_value(&heap, word).is_err());
    assert_eq!(arena.value_count(), 0);
}

#[test]
fn types_are_interned() {
    let mut arena = PermanentArena::new();
    let a = arena.promote_type(&TypeInfo::list(TypeInfo::Int)).unwrap();
    let b = arena.promote_type(&TypeInfo::list(TypeInfo::Int)).unwrap();
    let c = arena.promote_type(&TypeInfo::Int).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(arena.type_count(), 2);
    assert_eq!(arena.type_info(a).to_string(), "list(int)");
}

#[test]
fn adopted_values_are_distinct() {
    let mut arena = PermanentArena::new();
    let a = arena.adopt(Term::Int(1)).unwrap();
    let b = arena.adopt(Term::Int(1)).unwrap();
    assert_ne!(a, b);
    assert_eq!(arena.value_count(), 2);
}
