//! Stepping, spy points, and held variables for Stepwise.
//!
//! This crate provides:
//! - [`Tracer`] - Decides at each execution event whether to stop or print
//! - [`HeldVariableStore`] - Values the operator keeps across backtracking
//! - [`ConsoleCommand`] - The operator's command language
//! - [`DebugSession`] - Executes console commands against the current event

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod console;
pub mod held;
pub mod session;
pub mod trace;

pub use config::DebuggerConfig;
pub use console::{COMMAND_NAMES, ConsoleCommand, ValueRef};
pub use held::{HeldValue, HeldVariableStore};
pub use session::{ConsoleOutcome, DebugSession, SharedSession};
pub use trace::{
    ExecutionEvent, HumanFormatter, LiveVar, NoSpyPoints, OutputFormat, Port, PortCategory,
    PrintLevel, ProcedureSpyPoints, SpyAction, SpyMatcher, TraceCommand, TraceDecision,
    TraceOutput, TraceState, TraceStats, Tracer, Verdict,
};
