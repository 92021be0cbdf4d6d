//! Integration tests for the engine heap
//!
//! Tests allocation, materialization, and reclamation on backtracking.

use stepwise_foundation::{Cell, Heap, Term};

// =============================================================================
// Allocation
// =============================================================================

#[test]
fn heap_stores_nested_terms() {
    let mut heap = Heap::new();
    let term = Term::compound(
        "node",
        vec![Term::list(vec![Term::Int(1), Term::Int(2)]), Term::Char('z')],
    );
    let word = heap.store(&term).unwrap();
    assert_eq!(heap.materialize(word).unwrap(), term);
    assert_eq!(heap.len(), term.size());
}

#[test]
fn heap_rejects_compound_over_dead_argument() {
    let mut heap = Heap::new();
    let mark = heap.mark();
    let dead = heap.alloc_int(1).unwrap();
    heap.reclaim(mark);

    let result = heap.alloc(Cell::Compound {
        functor: "f".into(),
        args: vec![dead],
    });
    assert!(result.is_err());
    assert!(heap.is_empty());
}

// =============================================================================
// Reclamation
// =============================================================================

#[test]
fn reclaim_keeps_cells_below_mark() {
    let mut heap = Heap::new();
    let kept = heap.alloc_int(1).unwrap();
    let mark = heap.mark();
    let dropped = heap.alloc_int(2).unwrap();
    heap.reclaim(mark);

    assert!(heap.is_live(kept));
    assert!(!heap.is_live(dropped));
    assert_eq!(heap.len(), 1);
}

#[test]
fn reused_slot_does_not_revive_old_handle() {
    let mut heap = Heap::new();
    let mark = heap.mark();
    let old = heap.alloc_int(10).unwrap();
    heap.reclaim(mark);
    let new = heap.alloc_int(20).unwrap();

    assert_eq!(old.slot(), new.slot());
    assert!(!heap.is_live(old));
    assert_eq!(heap.materialize(new).unwrap(), Term::Int(20));
}

#[test]
fn reclaim_to_mark_is_idempotent() {
    let mut heap = Heap::new();
    let mark = heap.mark();
    heap.reclaim(mark);
    let word = heap.alloc_int(5).unwrap();
    heap.reclaim(mark);
    assert!(!heap.is_live(word));
    heap.reclaim(heap.mark());
    assert!(heap.is_empty());
}
