//! Error types for the Stepwise debugger.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! None of these errors end a debugging session: the operator loop reports
//! them and keeps prompting.

use std::fmt;

use thiserror::Error;

use crate::heap::Word;

/// The main error type for Stepwise operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid command parameter error.
    #[must_use]
    pub fn invalid_command(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCommand {
            command: command.into(),
            reason: reason.into(),
        })
    }

    /// Creates an unknown command error.
    #[must_use]
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownCommand(name.into()))
    }

    /// Creates an unknown live variable error.
    #[must_use]
    pub fn unknown_variable(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownVariable(name.into()))
    }

    /// Creates an unknown held variable error.
    #[must_use]
    pub fn unknown_held_variable(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownHeldVariable(name.into()))
    }

    /// Creates a dangling heap handle error.
    #[must_use]
    pub fn dangling(word: Word) -> Self {
        Self::new(ErrorKind::DanglingHandle(word))
    }

    /// Creates an editor (terminal I/O) error.
    #[must_use]
    pub fn editor(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Editor(message.into()))
    }

    /// Returns true if the failure only affects the command being issued.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self.kind, ErrorKind::Editor(_) | ErrorKind::Internal(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A command was recognized but its parameters are structurally invalid.
    #[error("invalid {command} command: {reason}")]
    InvalidCommand {
        /// The command name.
        command: String,
        /// Why the parameters were rejected.
        reason: String,
    },

    /// The operator typed something that is not a command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// No live variable with this name exists at the current event.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// No held variable with this name exists.
    #[error("unknown held variable: ${0}")]
    UnknownHeldVariable(String),

    /// A heap handle refers to storage that has been reclaimed.
    #[error("dangling heap reference: {0}")]
    DanglingHandle(Word),

    /// Reading operator input failed.
    #[error("editor error: {0}")]
    Editor(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Event number at which the error was raised.
    pub event: Option<u64>,
    /// Procedure active at that event.
    pub procedure: Option<String>,
    /// The operator input that triggered the error.
    pub input: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the event number.
    #[must_use]
    pub fn at_event(mut self, event: u64) -> Self {
        self.event = Some(event);
        self
    }

    /// Sets the procedure name.
    #[must_use]
    pub fn in_procedure(mut self, procedure: impl Into<String>) -> Self {
        self.procedure = Some(procedure.into());
        self
    }

    /// Sets the operator input.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(event) = self.event {
            write!(f, "at event {event}")?;
            if let Some(procedure) = &self.procedure {
                write!(f, " in {procedure}")?;
            }
        }
        if let Some(input) = &self.input {
            if self.event.is_some() {
                write!(f, " ")?;
            }
            write!(f, "(input: {input:?})")?;
        }
        Ok(())
    }
}
