//! Trace command interpretation for Stepwise.
//!
//! The [`Tracer`] is consulted once per execution event. It checks the event
//! against the current [`TraceCommand`], lets non-strict commands stop at spy
//! points, and writes summary lines for intermediate events the print level
//! asks for. When the verdict is [`Verdict::Stop`] the caller takes over:
//! it shows the stop line and talks to the operator.
//!
//! # Example
//!
//! ```text
//! mdb> goto 40          ;; stop at event 40
//! mdb> finish           ;; stop when the current invocation exits
//! mdb> print_level all  ;; print every event while running
//! mdb> continue         ;; run to the end
//! ```

pub mod command;
pub mod event;
pub mod format;
pub mod port;
pub mod spy;

pub use command::{PrintLevel, TraceCommand, TraceState, Verdict};
pub use event::{ExecutionEvent, LiveVar};
pub use format::{HumanFormatter, JsonFormatter, TraceFormatter, format_message};
pub use port::{Port, PortCategory};
pub use spy::{NoSpyPoints, ProcedureSpyPoints, SpyAction, SpyMatcher};

use std::io::{self, Write};

use tracing::{debug, trace, warn};

// =============================================================================
// Trace Output
// =============================================================================

/// Where summary lines are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceOutput {
    /// Discard summary lines.
    None,
    /// Write to stdout.
    #[default]
    Stdout,
    /// Write to stderr.
    Stderr,
    /// Keep lines in memory; read them back with [`Tracer::take_captured`].
    Capture,
}

/// How summary lines are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Column-aligned text.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

// =============================================================================
// Decisions and Statistics
// =============================================================================

/// Everything the tracer concluded about one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceDecision {
    /// Stop or continue.
    pub verdict: Verdict,
    /// Whether a summary line was printed for this (non-stopping) event.
    pub printed: bool,
    /// Whether the stop came from a spy point rather than the command.
    pub spy_stop: bool,
}

/// Counters kept across a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Events checked.
    pub events_seen: u64,
    /// Events that stopped.
    pub stops: u64,
    /// Intermediate summary lines printed.
    pub printed: u64,
    /// Events where the spy-point matcher was skipped because nothing
    /// could depend on it.
    pub unchecked: u64,
    /// Summary lines the output stream refused.
    pub write_failures: u64,
}

// =============================================================================
// Tracer
// =============================================================================

/// Holds the current command and its settings and judges events.
#[derive(Debug)]
pub struct Tracer {
    command: TraceCommand,
    state: TraceState,
    output: TraceOutput,
    format: OutputFormat,
    human_formatter: HumanFormatter,
    json_formatter: JsonFormatter,
    captured: Vec<String>,
    stats: TraceStats,
}

impl Tracer {
    /// Creates a tracer that starts by stopping at the first event.
    #[must_use]
    pub fn new(state: TraceState) -> Self {
        Self {
            command: TraceCommand::Goto { stop_event: 0 },
            state,
            output: TraceOutput::default(),
            format: OutputFormat::default(),
            human_formatter: HumanFormatter::new(),
            json_formatter: JsonFormatter::new(),
            captured: Vec::new(),
            stats: TraceStats::default(),
        }
    }

    /// Builder method to set the initial command.
    #[must_use]
    pub fn with_command(mut self, command: TraceCommand) -> Self {
        self.command = command;
        self
    }

    /// Builder method to set the output destination.
    #[must_use]
    pub fn with_output(mut self, output: TraceOutput) -> Self {
        self.output = output;
        self
    }

    /// Builder method to set the output format.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder method to replace the human-readable formatter.
    #[must_use]
    pub fn with_human_formatter(mut self, formatter: HumanFormatter) -> Self {
        self.human_formatter = formatter;
        self
    }

    /// The command in force.
    #[must_use]
    pub const fn command(&self) -> TraceCommand {
        self.command
    }

    /// Replaces the command in force.
    pub fn set_command(&mut self, command: TraceCommand) {
        debug!(old = %self.command, new = %command, "trace command changed");
        self.command = command;
    }

    /// The settings accompanying the command.
    #[must_use]
    pub const fn state(&self) -> &TraceState {
        &self.state
    }

    /// Sets the print level.
    pub fn set_print_level(&mut self, level: PrintLevel) {
        self.state.set_print_level(level);
        debug!(%level, must_check = self.state.must_check(), "print level changed");
    }

    /// Sets strictness.
    pub fn set_strict(&mut self, strict: bool) {
        self.state.set_strict(strict);
        debug!(strict, must_check = self.state.must_check(), "strictness changed");
    }

    /// Sets the output destination.
    pub fn set_output(&mut self, output: TraceOutput) {
        self.output = output;
    }

    /// Sets the output format.
    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> TraceStats {
        self.stats
    }

    /// Judges one event.
    ///
    /// The spy-point matcher is consulted only when the command continues
    /// and `must_check` is set: for stop-on-spy when the command is not
    /// strict, and for printing when the print level is `Some`.
    pub fn on_event(&mut self, event: &ExecutionEvent, spy: &dyn SpyMatcher) -> TraceDecision {
        self.stats.events_seen += 1;

        let mut decision = TraceDecision {
            verdict: self.command.decide(event),
            printed: false,
            spy_stop: false,
        };

        if !decision.verdict.is_stop() {
            if self.state.must_check() {
                if !self.state.strict() && spy.stops_at(event) {
                    decision.verdict = Verdict::Stop;
                    decision.spy_stop = true;
                } else {
                    let spy_match =
                        self.state.print_level() == PrintLevel::Some && spy.matches(event);
                    decision.printed = self.state.should_print(decision.verdict, spy_match);
                }
            } else {
                self.stats.unchecked += 1;
            }
        }

        if decision.verdict.is_stop() {
            self.stats.stops += 1;
            debug!(
                event = event.event_number(),
                port = %event.port(),
                command = %self.command,
                spy = decision.spy_stop,
                "stopping"
            );
        } else {
            trace!(event = event.event_number(), port = %event.port(), "continuing");
        }

        if decision.printed {
            self.stats.printed += 1;
            self.emit_summary(event);
        }

        decision
    }

    /// Renders the summary line for an event in the configured format.
    #[must_use]
    pub fn summary(&self, event: &ExecutionEvent) -> String {
        match self.format {
            OutputFormat::Human => self.human_formatter.format(event),
            OutputFormat::Json => self.json_formatter.format(event),
        }
    }

    /// Writes the summary line for an event to the configured output.
    pub fn emit_summary(&mut self, event: &ExecutionEvent) {
        let line = self.summary(event);
        self.emit(line);
    }

    /// Writes a line to the configured output.
    pub fn emit(&mut self, line: String) {
        match self.output {
            TraceOutput::None => {}
            TraceOutput::Stdout => self.write_to(&mut io::stdout().lock(), &line),
            TraceOutput::Stderr => self.write_to(&mut io::stderr().lock(), &line),
            TraceOutput::Capture => self.captured.push(line),
        }
    }

    fn write_to(&mut self, out: &mut dyn Write, line: &str) {
        if let Err(e) = writeln!(out, "{line}") {
            self.stats.write_failures += 1;
            warn!(error = %e, output = ?self.output, "failed to write trace line");
        }
    }

    /// Drains lines kept by [`TraceOutput::Capture`].
    pub fn take_captured(&mut self) -> Vec<String> {
        std::mem::take(&mut self.captured)
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(TraceState::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
