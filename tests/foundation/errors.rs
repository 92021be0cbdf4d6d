//! Integration tests for Error types
//!
//! Tests error construction, display, context, and recoverability.

use stepwise_foundation::{Error, ErrorContext, ErrorKind, Heap};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_invalid_command() {
    let err = Error::invalid_command("goto", "event number must be non-negative, got -1");
    assert!(matches!(err.kind, ErrorKind::InvalidCommand { .. }));
    assert_eq!(
        err.to_string(),
        "invalid goto command: event number must be non-negative, got -1"
    );
}

#[test]
fn error_unknown_command() {
    let err = Error::unknown_command("frobnicate");
    assert!(matches!(err.kind, ErrorKind::UnknownCommand(_)));
    assert!(err.to_string().contains("frobnicate"));
}

#[test]
fn error_unknown_variables() {
    assert_eq!(Error::unknown_variable("X").to_string(), "unknown variable: X");
    assert_eq!(
        Error::unknown_held_variable("acc").to_string(),
        "unknown held variable: $acc"
    );
}

#[test]
fn error_dangling_from_heap() {
    let mut heap = Heap::new();
    let mark = heap.mark();
    let word = heap.alloc_int(7).unwrap();
    heap.reclaim(mark);

    let err = heap.materialize(word).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DanglingHandle(w) if w == word));
    assert!(err.to_string().starts_with("dangling heap reference: @0#"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_without_event() {
    let ctx = ErrorContext::new().with_input("goto -3");
    assert_eq!(ctx.to_string(), "(input: \"goto -3\")");
}

#[test]
fn context_is_attached() {
    let err = Error::unknown_command("x").with_context(ErrorContext::new().at_event(3));
    let ctx = err.context.as_ref().unwrap();
    assert_eq!(ctx.event, Some(3));
    assert_eq!(ctx.procedure, None);
    assert_eq!(ctx.to_string(), "at event 3");
}

// =============================================================================
// Recoverability
// =============================================================================

#[test]
fn operator_mistakes_are_recoverable() {
    assert!(Error::invalid_command("mindepth", "bad").is_recoverable());
    assert!(Error::unknown_variable("Y").is_recoverable());
    assert!(Error::unknown_held_variable("y").is_recoverable());
}

#[test]
fn terminal_failures_are_not_recoverable() {
    assert!(!Error::editor("stdin closed").is_recoverable());
    assert!(!Error::new(ErrorKind::Internal("oops".into())).is_recoverable());
}
