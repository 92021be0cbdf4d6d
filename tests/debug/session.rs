//! Integration tests for the operator session
//!
//! Drives console commands against hand-built events, the way the runtime
//! does at a stop.

use stepwise_debug::{
    ConsoleOutcome, DebugSession, DebuggerConfig, ExecutionEvent, HumanFormatter, Port, PrintLevel,
    SharedSession, TraceCommand, TraceOutput,
};
use stepwise_foundation::{ErrorKind, Heap, Term, TypeInfo};

fn session() -> DebugSession {
    DebugSession::new(DebuggerConfig::interactive().with_output(TraceOutput::Capture))
}

fn stay(lines: &[&str]) -> ConsoleOutcome {
    ConsoleOutcome::Stay(lines.iter().map(|l| (*l).to_owned()).collect())
}

/// An EXIT event for `between/3` binding `X` to `x` on a fresh frame.
fn exit_with(heap: &mut Heap, x: i64) -> ExecutionEvent {
    let word = heap.alloc_int(x).unwrap();
    ExecutionEvent::new(10, Port::Exit, 2, 3)
        .with_procedure("between/3")
        .with_var("X", TypeInfo::Int, word)
}

// =============================================================================
// Held Variables Across Events
// =============================================================================

#[test]
fn hold_then_print_after_frame_is_gone() {
    let mut heap = Heap::new();
    let mut session = session();

    let frame = heap.mark();
    let event = exit_with(&mut heap, 2);
    assert_eq!(session.execute_line("hold x X", &event, &heap).unwrap(), stay(&[]));
    heap.reclaim(frame);

    let later = ExecutionEvent::new(22, Port::Redo, 2, 3).with_procedure("between/3");
    assert_eq!(
        session.execute_line("print $x", &later, &heap).unwrap(),
        stay(&["$x = 2"])
    );
    // The live variable itself is gone from the new event.
    let err = session.execute_line("print X", &later, &heap).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownVariable(_)));
}

#[test]
fn second_hold_reports_instead_of_failing() {
    let mut heap = Heap::new();
    let mut session = session();
    let event = exit_with(&mut heap, 2);

    session.execute_line("hold x X", &event, &heap).unwrap();
    let event = exit_with(&mut heap, 9);
    assert_eq!(
        session.execute_line("hold $x X", &event, &heap).unwrap(),
        stay(&["held variable $x already exists"])
    );
    assert_eq!(session.held().lookup("x").unwrap().value, &Term::Int(2));
}

#[test]
fn hold_copies_another_held_variable() {
    let mut heap = Heap::new();
    let mut session = session();
    let event = exit_with(&mut heap, 4);

    session.execute_line("hold b X", &event, &heap).unwrap();
    session.execute_line("hold a $b", &event, &heap).unwrap();
    assert_eq!(
        session.execute_line("held_vars", &event, &heap).unwrap(),
        stay(&["$a", "$b"])
    );
}

#[test]
fn hold_of_dangling_live_variable_is_recoverable() {
    let mut heap = Heap::new();
    let mut session = session();

    let frame = heap.mark();
    let event = exit_with(&mut heap, 1);
    heap.reclaim(frame);

    let err = session.execute_line("hold x X", &event, &heap).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DanglingHandle(_)));
    assert!(err.is_recoverable());
    assert!(session.held().is_empty());
}

// =============================================================================
// Settings and Resumption
// =============================================================================

#[test]
fn settings_commands_report_and_update() {
    let heap = Heap::new();
    let mut session = session();
    let event = ExecutionEvent::new(1, Port::Call, 1, 1).with_procedure("main/0");

    assert_eq!(
        session.execute_line("print_level", &event, &heap).unwrap(),
        stay(&["print level is some"])
    );
    session.execute_line("print_level none", &event, &heap).unwrap();
    session.execute_line("strict on", &event, &heap).unwrap();

    let state = session.tracer().state();
    assert_eq!(state.print_level(), PrintLevel::None);
    assert!(state.strict());
    assert!(!state.must_check());
}

#[test]
fn step_and_finish_resolve_against_current_event() {
    let heap = Heap::new();
    let mut session = session();
    let event = ExecutionEvent::new(12, Port::Call, 3, 7).with_procedure("even/1");

    assert_eq!(
        session.execute_line("", &event, &heap).unwrap(),
        ConsoleOutcome::Resume
    );
    assert_eq!(session.tracer().command(), TraceCommand::Goto { stop_event: 13 });

    session.execute_line("step 5", &event, &heap).unwrap();
    assert_eq!(session.tracer().command(), TraceCommand::Goto { stop_event: 17 });

    session.execute_line("finish", &event, &heap).unwrap();
    assert_eq!(session.tracer().command(), TraceCommand::Finish { stop_seqno: 7 });
}

#[test]
fn rejected_command_keeps_previous_command() {
    let heap = Heap::new();
    let mut session = session();
    let event = ExecutionEvent::new(3, Port::Call, 1, 2).with_procedure("p/0");

    session.execute_line("maxdepth 2", &event, &heap).unwrap();
    let err = session.execute_line("mindepth -1", &event, &heap).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::InvalidCommand { .. }));
    let ctx = err.context.unwrap();
    assert_eq!(ctx.event, Some(3));
    assert_eq!(ctx.input.as_deref(), Some("mindepth -1"));
    assert_eq!(session.tracer().command(), TraceCommand::MaxDepth { stop_depth: 2 });
}

#[test]
fn vars_lists_live_variable_types() {
    let mut heap = Heap::new();
    let mut session = session();
    let event = exit_with(&mut heap, 3);
    assert_eq!(
        session.execute_line("vars", &event, &heap).unwrap(),
        stay(&["X : int"])
    );
}

#[test]
fn stop_line_follows_configured_layout() {
    let mut heap = Heap::new();
    let event = exit_with(&mut heap, 2);

    assert_eq!(session().stop_line(&event), "      10:      3   2 EXIT between/3");

    let config = DebuggerConfig::interactive()
        .with_output(TraceOutput::Capture)
        .with_human(HumanFormatter::new().with_indent().with_vars());
    let session = DebugSession::new(config);
    assert_eq!(session.stop_line(&event), "      10:      3   2 EXIT     between/3 [X]");
}

// =============================================================================
// Shared Session
// =============================================================================

#[test]
fn shared_session_sees_updates() {
    let mut heap = Heap::new();
    let shared = SharedSession::new(session());
    let other = shared.clone();
    let event = exit_with(&mut heap, 8);

    shared.lock().execute_line("hold n X", &event, &heap).unwrap();
    assert!(other.lock().held().contains("n"));
}
