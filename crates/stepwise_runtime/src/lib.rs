//! Engine, debugger loop, and CLI for Stepwise.
//!
//! This crate provides:
//! - [`Engine`] - A small nondeterministic program that reports every port
//! - [`Debugger`] - The interactive hook that stops and prompts the operator
//! - [`LineEditor`] - Terminal and scripted operator input

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod debugger;
pub mod editor;
pub mod engine;

pub use debugger::Debugger;
pub use editor::{LineEditor, ReadResult, RustylineEditor, ScriptedEditor};
pub use engine::{Control, Engine, Outcome, Program, TraceHook};
