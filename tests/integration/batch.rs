//! Non-interactive runs

use serde_json::Value;
use stepwise_debug::{DebuggerConfig, OutputFormat, PrintLevel, SpyAction, TraceOutput};
use stepwise_runtime::{Debugger, Outcome, Program, ScriptedEditor};

fn batch(config: DebuggerConfig) -> Debugger<ScriptedEditor> {
    Debugger::with_editor(config.with_output(TraceOutput::Capture), ScriptedEditor::default())
}

fn small() -> Program {
    Program::default().with_range(1, 2)
}

#[test]
fn batch_prints_every_event() {
    let (outcome, mut debugger) = batch(DebuggerConfig::batch()).run(small(), None).unwrap();
    assert!(matches!(outcome, Outcome::Succeeded(_)));

    let lines = debugger.session_mut().tracer_mut().take_captured();
    assert_eq!(lines.len(), 26);
    assert!(lines[24].contains("EXIT main/0"));
    assert_eq!(debugger.session().tracer().stats().printed, 25);
    assert_eq!(debugger.editor().prompts(), 0);
}

#[test]
fn batch_json_lines_parse() {
    let config = DebuggerConfig::batch().with_format(OutputFormat::Json);
    let (_, mut debugger) = batch(config).run(small(), None).unwrap();
    let lines = debugger.session_mut().tracer_mut().take_captured();

    let (report, events) = lines.split_last().unwrap();
    assert_eq!(report, "main/0 succeeded: [6]");
    for (i, line) in events.iter().enumerate() {
        let record: Value = serde_json::from_str(line).unwrap();
        assert_eq!(record["event"], i as u64 + 1);
    }
    let exit: Value = serde_json::from_str(&events[9]).unwrap();
    assert_eq!(exit["procedure"], "between/3");
    assert_eq!(exit["vars"], serde_json::json!(["Lo", "Hi", "X"]));
}

#[test]
fn strict_batch_ignores_spy_points() {
    let mut debugger = batch(DebuggerConfig::batch().with_print_level(PrintLevel::None));
    debugger
        .session_mut()
        .spies_mut()
        .insert("divide/3", SpyAction::Stop);

    let (outcome, mut debugger) = debugger.run(Program::default(), None).unwrap();
    assert!(matches!(outcome, Outcome::Succeeded(_)));

    let stats = debugger.session().tracer().stats();
    assert_eq!(stats.stops, 0);
    assert_eq!(stats.unchecked, stats.events_seen);
    assert_eq!(
        debugger.session_mut().tracer_mut().take_captured(),
        ["main/0 succeeded: [6, 3]"]
    );
}

#[test]
fn print_spy_points_at_some_level() {
    let config = DebuggerConfig::batch().with_print_level(PrintLevel::Some);
    let mut debugger = batch(config);
    debugger
        .session_mut()
        .spies_mut()
        .insert("greater/2", SpyAction::Print);

    let (_, mut debugger) = debugger.run(small(), None).unwrap();
    let lines = debugger.session_mut().tracer_mut().take_captured();
    assert_eq!(
        lines,
        [
            "      16:      5   2 CALL greater/2",
            "      17:      5   2 FAIL greater/2",
            "main/0 succeeded: [6]",
        ]
    );
}

#[test]
fn event_limit_stops_run() {
    let (outcome, debugger) = batch(DebuggerConfig::batch().with_print_level(PrintLevel::None))
        .run(Program::default(), Some(7))
        .unwrap();
    assert_eq!(outcome, Outcome::EventLimit);
    assert_eq!(debugger.session().tracer().stats().events_seen, 7);
}
