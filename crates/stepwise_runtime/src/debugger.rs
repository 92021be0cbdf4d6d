//! The interactive debugger.
//!
//! [`Debugger`] sits between the engine and the operator: it hands each
//! event to the session, shows the stop line when the session says stop,
//! then reads console commands until one resumes execution.

use stepwise_debug::{ConsoleOutcome, DebugSession, DebuggerConfig, ExecutionEvent};
use stepwise_foundation::{Heap, Result};
use tracing::{debug, warn};

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::engine::{Control, Engine, Outcome, Program, TraceHook};

/// Interactive debugger hook.
pub struct Debugger<E: LineEditor = RustylineEditor> {
    session: DebugSession,
    editor: E,
}

impl Debugger<RustylineEditor> {
    /// Creates a debugger reading from the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(config: DebuggerConfig) -> Result<Self> {
        Ok(Self::with_editor(config, RustylineEditor::new()?))
    }
}

impl<E: LineEditor> Debugger<E> {
    /// Creates a debugger with the given editor.
    pub fn with_editor(config: DebuggerConfig, editor: E) -> Self {
        Self {
            session: DebugSession::new(config),
            editor,
        }
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &DebugSession {
        &self.session
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut DebugSession {
        &mut self.session
    }

    /// Returns a reference to the editor.
    #[must_use]
    pub const fn editor(&self) -> &E {
        &self.editor
    }

    /// Runs `program` under this debugger.
    ///
    /// # Errors
    ///
    /// Returns an error if reading operator input fails.
    pub fn run(self, program: Program, max_events: Option<u64>) -> Result<(Outcome, Self)> {
        let mut engine = Engine::new(program, self);
        if let Some(limit) = max_events {
            engine = engine.with_max_events(limit);
        }
        let outcome = engine.run()?;
        let mut debugger = engine.into_hook();
        debugger.report(&outcome);
        Ok((outcome, debugger))
    }

    fn say(&mut self, line: String) {
        self.session.tracer_mut().emit(line);
    }

    fn report(&mut self, outcome: &Outcome) {
        let line = match outcome {
            Outcome::Succeeded(results) => {
                let results: Vec<String> = results.iter().map(ToString::to_string).collect();
                format!("main/0 succeeded: [{}]", results.join(", "))
            }
            Outcome::Exception(term) => format!("uncaught exception: {term}"),
            Outcome::Aborted => "execution aborted".to_owned(),
            Outcome::EventLimit => "event limit reached".to_owned(),
        };
        self.say(line);
    }

    /// Reads and executes commands until one resumes or quits.
    fn interact(&mut self, event: &ExecutionEvent, heap: &Heap) -> Result<Control> {
        loop {
            let input = match self.editor.read_line(&self.session.config().prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => {
                    debug!("end of input at prompt");
                    return Ok(Control::Abort);
                }
            };

            let trimmed = input.trim();
            if !trimmed.is_empty() {
                self.editor.add_history(trimmed);
            }

            match self.session.execute_line(&input, event, heap) {
                Ok(ConsoleOutcome::Resume) => return Ok(Control::Proceed),
                Ok(ConsoleOutcome::Quit) => return Ok(Control::Abort),
                Ok(ConsoleOutcome::Stay(lines)) => {
                    for line in lines {
                        self.say(line);
                    }
                }
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "command failed");
                    self.say(format!("error: {e}"));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<E: LineEditor> TraceHook for Debugger<E> {
    fn on_event(&mut self, event: &ExecutionEvent, heap: &Heap) -> Result<Control> {
        let decision = self.session.on_event(event);
        if !decision.verdict.is_stop() {
            return Ok(Control::Proceed);
        }

        let line = self.session.stop_line(event);
        self.say(line);
        if !self.session.config().interactive {
            return Ok(Control::Proceed);
        }
        self.interact(event, heap)
    }
}
