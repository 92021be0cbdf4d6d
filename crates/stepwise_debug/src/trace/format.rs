//! Summary line formatters.
//!
//! Provides human-readable and JSON renderings of execution events, plus the
//! grow-to-fit message builder the rest of the debugger formats through.

use std::fmt::{self, Write as _};

use serde::Serialize;

use super::event::ExecutionEvent;
use super::port::Port;

// =============================================================================
// Message Formatting
// =============================================================================

const INITIAL_MESSAGE_CAPACITY: usize = 128;

/// Formats arguments into a freshly allocated string.
///
/// The buffer grows until the whole message fits; output is never
/// truncated. Ownership of the result passes to the caller.
#[must_use]
pub fn format_message(args: fmt::Arguments<'_>) -> String {
    if let Some(s) = args.as_str() {
        return s.to_owned();
    }
    let mut out = String::with_capacity(INITIAL_MESSAGE_CAPACITY);
    // A String sink cannot fail; only a broken Display impl can, and then
    // the partial message is still the best diagnostic available.
    let _ = out.write_fmt(args);
    out
}

// =============================================================================
// Trace Formatter Trait
// =============================================================================

/// Trait for rendering summary lines.
pub trait TraceFormatter {
    /// Formats one event.
    fn format(&self, event: &ExecutionEvent) -> String;
}

// =============================================================================
// Human-Readable Formatter
// =============================================================================

/// Renders column-aligned summary lines:
///
/// ```text
///       12:      5   3 EXIT even/1
/// ```
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Whether to indent the procedure name by call depth.
    pub indent_by_depth: bool,
    /// Whether to list the names of live variables after the procedure.
    pub show_vars: bool,
}

impl HumanFormatter {
    /// Creates a new human formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to indent by depth.
    #[must_use]
    pub fn with_indent(mut self) -> Self {
        self.indent_by_depth = true;
        self
    }

    /// Builder method to list live variable names.
    #[must_use]
    pub fn with_vars(mut self) -> Self {
        self.show_vars = true;
        self
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, event: &ExecutionEvent) -> String {
        let indent = if self.indent_by_depth {
            event.call_depth() as usize * 2
        } else {
            0
        };
        let mut line = format_message(format_args!(
            "{:>8}: {:>6} {:>3} {} {:indent$}{}",
            event.event_number(),
            event.call_seqno(),
            event.call_depth(),
            event.port(),
            "",
            event.procedure(),
        ));
        if self.show_vars && !event.live_vars().is_empty() {
            let names: Vec<&str> = event.live_vars().iter().map(|v| v.name.as_ref()).collect();
            let _ = write!(line, " [{}]", names.join(", "));
        }
        line
    }
}

// =============================================================================
// JSON Formatter
// =============================================================================

#[derive(Serialize)]
struct SummaryRecord<'a> {
    event: u64,
    seqno: u64,
    depth: u32,
    port: Port,
    procedure: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    vars: Vec<&'a str>,
}

impl<'a> From<&'a ExecutionEvent> for SummaryRecord<'a> {
    fn from(event: &'a ExecutionEvent) -> Self {
        Self {
            event: event.event_number(),
            seqno: event.call_seqno(),
            depth: event.call_depth(),
            port: event.port(),
            procedure: event.procedure(),
            vars: event.live_vars().iter().map(|v| v.name.as_ref()).collect(),
        }
    }
}

/// Renders summary lines as single-line JSON objects.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Creates a new JSON formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, event: &ExecutionEvent) -> String {
        // Plain strings and integers only; serialization cannot fail.
        serde_json::to_string(&SummaryRecord::from(event)).unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================
