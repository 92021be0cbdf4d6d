//! Debugging session state and command execution.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stepwise_foundation::{Error, ErrorContext, Heap, Result};
use tracing::debug;

use crate::config::DebuggerConfig;
use crate::console::{ConsoleCommand, HELP, ValueRef};
use crate::held::HeldVariableStore;
use crate::trace::{
    ExecutionEvent, ProcedureSpyPoints, SpyAction, TraceCommand, TraceDecision, TraceState, Tracer,
    format_message,
};

/// What the caller should do after a console command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleOutcome {
    /// Hand control back to the engine.
    Resume,
    /// Show these lines and prompt again.
    Stay(Vec<String>),
    /// Abandon execution.
    Quit,
}

impl ConsoleOutcome {
    fn line(line: String) -> Self {
        Self::Stay(vec![line])
    }
}

/// One operator's debugging session.
///
/// Owns the tracer, the held-variable store and the spy points. Everything
/// here lives as long as the session; nothing points into the engine heap.
#[derive(Debug)]
pub struct DebugSession {
    config: DebuggerConfig,
    tracer: Tracer,
    held: HeldVariableStore,
    spies: ProcedureSpyPoints,
}

impl DebugSession {
    /// Creates a session from configuration.
    #[must_use]
    pub fn new(config: DebuggerConfig) -> Self {
        let tracer = Tracer::new(TraceState::new(config.print_level, config.strict))
            .with_command(config.initial_command)
            .with_output(config.output)
            .with_format(config.format)
            .with_human_formatter(config.human.clone());
        let held = HeldVariableStore::with_capacity(config.held_capacity);
        Self {
            config,
            tracer,
            held,
            spies: ProcedureSpyPoints::new(),
        }
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &DebuggerConfig {
        &self.config
    }

    /// The tracer.
    #[must_use]
    pub const fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Mutable access to the tracer.
    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// The held-variable store.
    #[must_use]
    pub const fn held(&self) -> &HeldVariableStore {
        &self.held
    }

    /// The spy points.
    #[must_use]
    pub const fn spies(&self) -> &ProcedureSpyPoints {
        &self.spies
    }

    /// Mutable access to the spy points.
    pub fn spies_mut(&mut self) -> &mut ProcedureSpyPoints {
        &mut self.spies
    }

    /// Judges one event against the current command and spy points.
    pub fn on_event(&mut self, event: &ExecutionEvent) -> TraceDecision {
        self.tracer.on_event(event, &self.spies)
    }

    /// The line shown when execution stops at `event`.
    #[must_use]
    pub fn stop_line(&self, event: &ExecutionEvent) -> String {
        self.tracer.summary(event)
    }

    /// Parses and executes one input line at `event`.
    ///
    /// # Errors
    ///
    /// Returns the parse or execution error, annotated with the event and
    /// the input. The session is unchanged by a failed command.
    pub fn execute_line(&mut self, line: &str, event: &ExecutionEvent, heap: &Heap) -> Result<ConsoleOutcome> {
        ConsoleCommand::parse(line)
            .and_then(|command| self.execute(command, event, heap))
            .map_err(|e| {
                e.with_context(
                    ErrorContext::new()
                        .at_event(event.event_number())
                        .in_procedure(event.procedure())
                        .with_input(line.trim()),
                )
            })
    }

    /// Executes a parsed command at `event`.
    ///
    /// # Errors
    ///
    /// Returns an error if a named variable does not exist or a value can no
    /// longer be read from the heap.
    pub fn execute(&mut self, command: ConsoleCommand, event: &ExecutionEvent, heap: &Heap) -> Result<ConsoleOutcome> {
        debug!(?command, event = event.event_number(), "executing console command");
        match command {
            ConsoleCommand::Resume(trace_command) => {
                self.tracer.set_command(trace_command);
                Ok(ConsoleOutcome::Resume)
            }
            ConsoleCommand::Step(n) => {
                self.tracer.set_command(TraceCommand::Goto {
                    stop_event: event.event_number().saturating_add(n),
                });
                Ok(ConsoleOutcome::Resume)
            }
            ConsoleCommand::FinishCurrent => {
                self.tracer.set_command(TraceCommand::Finish {
                    stop_seqno: event.call_seqno(),
                });
                Ok(ConsoleOutcome::Resume)
            }
            ConsoleCommand::PrintLevel(None) => Ok(ConsoleOutcome::line(format_message(format_args!(
                "print level is {}",
                self.tracer.state().print_level()
            )))),
            ConsoleCommand::PrintLevel(Some(level)) => {
                self.tracer.set_print_level(level);
                Ok(ConsoleOutcome::line(format_message(format_args!(
                    "print level set to {level}"
                ))))
            }
            ConsoleCommand::Strict(None) => Ok(ConsoleOutcome::line(format_message(format_args!(
                "strict is {}",
                on_off(self.tracer.state().strict())
            )))),
            ConsoleCommand::Strict(Some(strict)) => {
                self.tracer.set_strict(strict);
                Ok(ConsoleOutcome::line(format_message(format_args!(
                    "strict set to {}",
                    on_off(strict)
                ))))
            }
            ConsoleCommand::Spy {
                procedure,
                print_only,
            } => {
                let action = if print_only {
                    SpyAction::Print
                } else {
                    SpyAction::Stop
                };
                self.spies.insert(procedure, action);
                Ok(ConsoleOutcome::Stay(Vec::new()))
            }
            ConsoleCommand::NoSpy(procedure) => {
                if self.spies.remove(&procedure) {
                    Ok(ConsoleOutcome::Stay(Vec::new()))
                } else {
                    Ok(ConsoleOutcome::line(format_message(format_args!(
                        "no spy point on {procedure}"
                    ))))
                }
            }
            ConsoleCommand::Hold { name, source } => self.hold(&name, &source, event, heap),
            ConsoleCommand::Print(source) => self.print(&source, event, heap),
            ConsoleCommand::HeldVars => Ok(ConsoleOutcome::Stay(
                self.held.render_list().lines().map(str::to_owned).collect(),
            )),
            ConsoleCommand::Vars => Ok(ConsoleOutcome::Stay(
                event
                    .live_vars()
                    .iter()
                    .map(|var| format_message(format_args!("{} : {}", var.name, var.type_info)))
                    .collect(),
            )),
            ConsoleCommand::Help => Ok(ConsoleOutcome::Stay(
                HELP.iter().map(|line| (*line).to_owned()).collect(),
            )),
            ConsoleCommand::Quit => Ok(ConsoleOutcome::Quit),
        }
    }

    fn hold(&mut self, name: &str, source: &ValueRef, event: &ExecutionEvent, heap: &Heap) -> Result<ConsoleOutcome> {
        let added = match source {
            ValueRef::Live(var) => {
                let live = event
                    .live_var(var)
                    .ok_or_else(|| Error::unknown_variable(var.as_str()))?;
                self.held.add(name, &live.type_info, live.value, heap)?
            }
            ValueRef::Held(held) => {
                let (type_info, value) = self
                    .held
                    .lookup(held)
                    .map(|h| (h.type_info.clone(), h.value.clone()))
                    .ok_or_else(|| Error::unknown_held_variable(held.as_str()))?;
                self.held.add_term(name, &type_info, value)?
            }
        };

        if added {
            Ok(ConsoleOutcome::Stay(Vec::new()))
        } else {
            Ok(ConsoleOutcome::line(format_message(format_args!(
                "held variable ${name} already exists"
            ))))
        }
    }

    fn print(&self, source: &ValueRef, event: &ExecutionEvent, heap: &Heap) -> Result<ConsoleOutcome> {
        let line = match source {
            ValueRef::Live(var) => {
                let live = event
                    .live_var(var)
                    .ok_or_else(|| Error::unknown_variable(var.as_str()))?;
                let value = heap.materialize(live.value)?;
                format_message(format_args!("{var} = {value}"))
            }
            ValueRef::Held(held) => {
                let value = self
                    .held
                    .lookup(held)
                    .ok_or_else(|| Error::unknown_held_variable(held.as_str()))?;
                format_message(format_args!("${held} = {}", value.value))
            }
        };
        Ok(ConsoleOutcome::line(line))
    }
}

impl Default for DebugSession {
    fn default() -> Self {
        Self::new(DebuggerConfig::default())
    }
}

const fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

// =============================================================================
// Shared Session
// =============================================================================

/// A session shared between control paths of one host.
///
/// Operations on the session are serialized by a single mutex.
#[derive(Clone, Debug)]
pub struct SharedSession(Arc<Mutex<DebugSession>>);

impl SharedSession {
    /// Wraps a session.
    #[must_use]
    pub fn new(session: DebugSession) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    /// Locks the session.
    ///
    /// A panic while the lock was held does not make the session unusable;
    /// every session operation leaves it consistent.
    pub fn lock(&self) -> MutexGuard<'_, DebugSession> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<DebugSession> for SharedSession {
    fn from(session: DebugSession) -> Self {
        Self::new(session)
    }
}

// =============================================================================
// Tests
// =============================================================================
