//! Integration tests for stepping commands and trace state

use proptest::prelude::*;
use stepwise_debug::{
    ExecutionEvent, NoSpyPoints, Port, PrintLevel, ProcedureSpyPoints, SpyAction, TraceCommand,
    TraceOutput, TraceState, Tracer, Verdict,
};

fn event(number: u64, port: Port, depth: u32, seqno: u64) -> ExecutionEvent {
    ExecutionEvent::new(number, port, depth, seqno).with_procedure("p/1")
}

fn verdicts(command: TraceCommand, events: &[ExecutionEvent]) -> Vec<Verdict> {
    events.iter().map(|e| command.decide(e)).collect()
}

// =============================================================================
// Decision Rules
// =============================================================================

#[test]
fn goto_stops_at_target_event() {
    let command = TraceCommand::goto(10).unwrap();
    let mut tracer = Tracer::default()
        .with_command(command)
        .with_output(TraceOutput::Capture);

    let mut seen = Vec::new();
    for number in 8..=11 {
        let decision = tracer.on_event(&event(number, Port::Call, 1, number), &NoSpyPoints);
        seen.push(decision.verdict);
        if decision.verdict.is_stop() {
            break;
        }
    }
    assert_eq!(seen, [Verdict::Continue, Verdict::Continue, Verdict::Stop]);
    assert_eq!(tracer.stats().events_seen, 3);
}

#[test]
fn finish_waits_for_final_port_of_same_call() {
    let command = TraceCommand::finish(3).unwrap();
    let events = [
        event(1, Port::Call, 2, 3),
        event(2, Port::Redo, 2, 3),
        event(3, Port::Exit, 2, 3),
    ];
    assert_eq!(
        verdicts(command, &events),
        [Verdict::Continue, Verdict::Continue, Verdict::Stop]
    );
}

#[test]
fn finish_ignores_other_calls() {
    let command = TraceCommand::finish(3).unwrap();
    assert_eq!(command.decide(&event(1, Port::Exit, 2, 4)), Verdict::Continue);
    assert_eq!(command.decide(&event(2, Port::Exception, 2, 3)), Verdict::Stop);
    assert_eq!(command.decide(&event(3, Port::Fail, 2, 3)), Verdict::Stop);
}

#[test]
fn forward_skips_failure_driven_ports() {
    let events = [
        event(1, Port::Redo, 1, 1),
        event(2, Port::Fail, 1, 1),
        event(3, Port::Call, 1, 2),
    ];
    assert_eq!(
        verdicts(TraceCommand::ResumeForward, &events),
        [Verdict::Continue, Verdict::Continue, Verdict::Stop]
    );
}

#[test]
fn return_skips_exits_only() {
    assert_eq!(TraceCommand::Return.decide(&event(1, Port::Exit, 1, 1)), Verdict::Continue);
    assert_eq!(TraceCommand::Return.decide(&event(2, Port::Fail, 1, 1)), Verdict::Stop);
}

#[test]
fn depth_bounds() {
    let min = TraceCommand::min_depth(3).unwrap();
    let max = TraceCommand::max_depth(3).unwrap();
    assert_eq!(min.decide(&event(1, Port::Call, 2, 1)), Verdict::Continue);
    assert_eq!(min.decide(&event(1, Port::Call, 3, 1)), Verdict::Stop);
    assert_eq!(max.decide(&event(1, Port::Call, 4, 1)), Verdict::Continue);
    assert_eq!(max.decide(&event(1, Port::Call, 3, 1)), Verdict::Stop);
}

#[test]
fn to_end_never_stops() {
    for port in [Port::Call, Port::Exit, Port::Redo, Port::Fail, Port::Exception] {
        assert_eq!(TraceCommand::ToEnd.decide(&event(1, port, 0, 1)), Verdict::Continue);
    }
}

#[test]
fn negative_parameters_are_rejected() {
    assert!(TraceCommand::goto(-1).is_err());
    assert!(TraceCommand::finish(-5).is_err());
    assert!(TraceCommand::min_depth(-1).is_err());
    assert!(TraceCommand::max_depth(i64::MIN).is_err());
    assert!(TraceCommand::max_depth(i64::from(u32::MAX) + 1).is_err());
}

// =============================================================================
// Trace State
// =============================================================================

#[test]
fn must_check_tracks_settings() {
    let mut state = TraceState::new(PrintLevel::All, false);
    assert!(state.must_check());

    state.set_print_level(PrintLevel::None);
    state.set_strict(true);
    assert!(!state.must_check());

    state.set_strict(false);
    assert!(state.must_check());
}

#[test]
fn strict_silent_tracer_skips_spy_points() {
    let spies = ProcedureSpyPoints::new().with("p/1", SpyAction::Stop);
    let mut tracer = Tracer::new(TraceState::new(PrintLevel::None, true))
        .with_command(TraceCommand::ToEnd)
        .with_output(TraceOutput::Capture);

    for number in 1..=5 {
        assert!(!tracer.on_event(&event(number, Port::Call, 1, number), &spies).verdict.is_stop());
    }
    assert_eq!(tracer.stats().unchecked, 5);
    assert!(tracer.take_captured().is_empty());
}

#[test]
fn spy_point_stops_non_strict_command() {
    let spies = ProcedureSpyPoints::new().with("p/1", SpyAction::Stop);
    let mut tracer = Tracer::default()
        .with_command(TraceCommand::ToEnd)
        .with_output(TraceOutput::Capture);

    let decision = tracer.on_event(&event(1, Port::Call, 1, 1), &spies);
    assert!(decision.verdict.is_stop());
    assert!(decision.spy_stop);
}

#[test]
fn print_spy_point_prints_at_some_level() {
    let spies = ProcedureSpyPoints::new().with("p/1", SpyAction::Print);
    let mut tracer = Tracer::default()
        .with_command(TraceCommand::ToEnd)
        .with_output(TraceOutput::Capture);

    let decision = tracer.on_event(&event(7, Port::Exit, 2, 4), &spies);
    assert!(!decision.verdict.is_stop());
    assert!(decision.printed);
    assert_eq!(tracer.take_captured(), ["       7:      4   2 EXIT p/1"]);
}

// =============================================================================
// Properties
// =============================================================================

fn any_port() -> impl Strategy<Value = Port> {
    prop::sample::select(vec![
        Port::Call,
        Port::Exit,
        Port::Redo,
        Port::Fail,
        Port::Exception,
    ])
}

proptest! {
    #[test]
    fn decide_is_deterministic(
        target in 0i64..100,
        number in 0u64..100,
        depth in 0u32..10,
        seqno in 0u64..10,
        port in any_port(),
    ) {
        let e = event(number, port, depth, seqno);
        for command in [
            TraceCommand::goto(target).unwrap(),
            TraceCommand::finish(target).unwrap(),
            TraceCommand::min_depth(target).unwrap(),
            TraceCommand::max_depth(target).unwrap(),
            TraceCommand::ResumeForward,
            TraceCommand::Return,
            TraceCommand::ToEnd,
        ] {
            prop_assert_eq!(command.decide(&e), command.decide(&e.clone()));
        }
    }
}
