//! Stepping commands and the stop decision.
//!
//! Each [`TraceCommand`] is a closed rule over the current event's port,
//! depth, sequence number and event number. [`TraceCommand::decide`] keeps no
//! cursor between calls, so backtracking that revisits a depth or sequence
//! number needs no extra bookkeeping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stepwise_foundation::{Error, Result};

use super::event::ExecutionEvent;
use super::port::Port;

// =============================================================================
// Verdict
// =============================================================================

/// Outcome of checking one event against the current command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Hand control to the operator.
    Stop,
    /// Keep running.
    Continue,
}

impl Verdict {
    /// Returns true for [`Verdict::Stop`].
    #[must_use]
    pub const fn is_stop(self) -> bool {
        matches!(self, Self::Stop)
    }
}

// =============================================================================
// Trace Command
// =============================================================================

/// The stepping command currently in force.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TraceCommand {
    /// Stop at the first event numbered `stop_event` or later.
    Goto {
        /// Target event number.
        stop_event: u64,
    },
    /// Stop when invocation `stop_seqno` exits, fails or throws.
    Finish {
        /// Sequence number of the invocation to finish.
        stop_seqno: u64,
    },
    /// Stop at the next event not reached by failure.
    ResumeForward,
    /// Stop at the next event that is not an exit.
    Return,
    /// Stop at the next event at `stop_depth` or deeper.
    MinDepth {
        /// Minimum depth to stop at.
        stop_depth: u32,
    },
    /// Stop at the next event at `stop_depth` or shallower.
    MaxDepth {
        /// Maximum depth to stop at.
        stop_depth: u32,
    },
    /// Never stop.
    ToEnd,
}

fn non_negative<T: TryFrom<i64>>(command: &str, what: &str, value: i64) -> Result<T> {
    if value < 0 {
        return Err(Error::invalid_command(
            command,
            format!("{what} must be non-negative, got {value}"),
        ));
    }
    T::try_from(value)
        .map_err(|_| Error::invalid_command(command, format!("{what} {value} is out of range")))
}

impl TraceCommand {
    /// Creates a `Goto` command, rejecting negative event numbers.
    ///
    /// # Errors
    ///
    /// Returns an invalid-command error if `stop_event` is negative.
    pub fn goto(stop_event: i64) -> Result<Self> {
        Ok(Self::Goto {
            stop_event: non_negative("goto", "event number", stop_event)?,
        })
    }

    /// Creates a `Finish` command, rejecting negative sequence numbers.
    ///
    /// # Errors
    ///
    /// Returns an invalid-command error if `stop_seqno` is negative.
    pub fn finish(stop_seqno: i64) -> Result<Self> {
        Ok(Self::Finish {
            stop_seqno: non_negative("finish", "sequence number", stop_seqno)?,
        })
    }

    /// Creates a `MinDepth` command, rejecting negative or oversized depths.
    ///
    /// # Errors
    ///
    /// Returns an invalid-command error if `stop_depth` does not fit a depth.
    pub fn min_depth(stop_depth: i64) -> Result<Self> {
        Ok(Self::MinDepth {
            stop_depth: non_negative("mindepth", "depth", stop_depth)?,
        })
    }

    /// Creates a `MaxDepth` command, rejecting negative or oversized depths.
    ///
    /// # Errors
    ///
    /// Returns an invalid-command error if `stop_depth` does not fit a depth.
    pub fn max_depth(stop_depth: i64) -> Result<Self> {
        Ok(Self::MaxDepth {
            stop_depth: non_negative("maxdepth", "depth", stop_depth)?,
        })
    }

    /// Decides whether `event` ends this command.
    #[must_use]
    pub fn decide(&self, event: &ExecutionEvent) -> Verdict {
        let stop = match *self {
            Self::Goto { stop_event } => event.event_number() >= stop_event,
            Self::Finish { stop_seqno } => {
                event.call_seqno() == stop_seqno && event.port().is_final()
            }
            Self::ResumeForward => !event.port().is_failure_driven(),
            Self::Return => event.port() != Port::Exit,
            Self::MinDepth { stop_depth } => event.call_depth() >= stop_depth,
            Self::MaxDepth { stop_depth } => event.call_depth() <= stop_depth,
            Self::ToEnd => false,
        };
        if stop { Verdict::Stop } else { Verdict::Continue }
    }

    /// Short name of the command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Goto { .. } => "goto",
            Self::Finish { .. } => "finish",
            Self::ResumeForward => "forward",
            Self::Return => "return",
            Self::MinDepth { .. } => "mindepth",
            Self::MaxDepth { .. } => "maxdepth",
            Self::ToEnd => "continue",
        }
    }
}

impl fmt::Display for TraceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Goto { stop_event } => write!(f, "goto {stop_event}"),
            Self::Finish { stop_seqno } => write!(f, "finish {stop_seqno}"),
            Self::MinDepth { stop_depth } | Self::MaxDepth { stop_depth } => {
                write!(f, "{} {stop_depth}", self.name())
            }
            Self::ResumeForward | Self::Return | Self::ToEnd => f.write_str(self.name()),
        }
    }
}

// =============================================================================
// Print Level and Trace State
// =============================================================================

/// Which intermediate events get a summary line while running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintLevel {
    /// Print nothing between stops.
    None,
    /// Print events that match a spy point.
    #[default]
    Some,
    /// Print every event.
    All,
}

impl fmt::Display for PrintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Some => "some",
            Self::All => "all",
        })
    }
}

impl FromStr for PrintLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Self::None),
            "some" => Ok(Self::Some),
            "all" => Ok(Self::All),
            other => Err(Error::invalid_command(
                "print_level",
                format!("expected none, some or all, got {other:?}"),
            )),
        }
    }
}

/// Settings that accompany the current command.
///
/// `must_check` is derived: it is true whenever spy points can matter,
/// that is when the command is not strict or something may be printed.
/// Every setter re-derives it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceState {
    print_level: PrintLevel,
    strict: bool,
    must_check: bool,
}

impl TraceState {
    /// Creates a state with the invariant established.
    #[must_use]
    pub const fn new(print_level: PrintLevel, strict: bool) -> Self {
        Self {
            print_level,
            strict,
            must_check: Self::derive_must_check(print_level, strict),
        }
    }

    const fn derive_must_check(print_level: PrintLevel, strict: bool) -> bool {
        !strict || !matches!(print_level, PrintLevel::None)
    }

    /// The current print level.
    #[must_use]
    pub const fn print_level(&self) -> PrintLevel {
        self.print_level
    }

    /// Whether spy points are ignored for stopping.
    #[must_use]
    pub const fn strict(&self) -> bool {
        self.strict
    }

    /// Whether the spy-point matcher has to be consulted at all.
    #[must_use]
    pub const fn must_check(&self) -> bool {
        self.must_check
    }

    /// Sets the print level.
    pub fn set_print_level(&mut self, print_level: PrintLevel) {
        self.print_level = print_level;
        self.must_check = Self::derive_must_check(self.print_level, self.strict);
    }

    /// Sets strictness.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
        self.must_check = Self::derive_must_check(self.print_level, self.strict);
    }

    /// Decides whether a summary line is printed for an event that did not
    /// stop. Stops always print, which is the caller's job.
    #[must_use]
    pub const fn should_print(&self, verdict: Verdict, spy_match: bool) -> bool {
        if verdict.is_stop() {
            return false;
        }
        match self.print_level {
            PrintLevel::All => true,
            PrintLevel::Some => spy_match,
            PrintLevel::None => false,
        }
    }
}

impl Default for TraceState {
    fn default() -> Self {
        Self::new(PrintLevel::default(), false)
    }
}

// =============================================================================
// Tests
// =============================================================================
