//! Execution event snapshots.
//!
//! The engine builds one [`ExecutionEvent`] per instrumentation point and
//! hands it to the tracer. Events are immutable once built.

use std::sync::Arc;

use stepwise_foundation::{TypeInfo, Word};

use super::port::Port;

/// A variable visible to the operator at an event.
///
/// The value is a handle into the engine heap and is only guaranteed to be
/// readable while the event is current.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveVar {
    /// Source-level variable name.
    pub name: Arc<str>,
    /// Type descriptor of the value.
    pub type_info: TypeInfo,
    /// Heap handle of the value.
    pub value: Word,
}

/// Snapshot of one execution event.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionEvent {
    event_number: u64,
    port: Port,
    call_depth: u32,
    call_seqno: u64,
    procedure: Arc<str>,
    live_vars: Vec<LiveVar>,
}

impl ExecutionEvent {
    /// Creates an event with no procedure name and no live variables.
    #[must_use]
    pub fn new(event_number: u64, port: Port, call_depth: u32, call_seqno: u64) -> Self {
        Self {
            event_number,
            port,
            call_depth,
            call_seqno,
            procedure: Arc::from(""),
            live_vars: Vec::new(),
        }
    }

    /// Builder method to name the procedure the event belongs to.
    #[must_use]
    pub fn with_procedure(mut self, procedure: impl Into<Arc<str>>) -> Self {
        self.procedure = procedure.into();
        self
    }

    /// Builder method to add a live variable.
    #[must_use]
    pub fn with_var(mut self, name: &str, type_info: TypeInfo, value: Word) -> Self {
        self.live_vars.push(LiveVar {
            name: Arc::from(name),
            type_info,
            value,
        });
        self
    }

    /// Monotonically increasing event counter.
    #[must_use]
    pub const fn event_number(&self) -> u64 {
        self.event_number
    }

    /// The port this event was reported at.
    #[must_use]
    pub const fn port(&self) -> Port {
        self.port
    }

    /// Nesting depth of the invocation.
    #[must_use]
    pub const fn call_depth(&self) -> u32 {
        self.call_depth
    }

    /// Identifier of the invocation, shared by all of its events.
    #[must_use]
    pub const fn call_seqno(&self) -> u64 {
        self.call_seqno
    }

    /// Name of the procedure, empty if the engine did not supply one.
    #[must_use]
    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// Variables visible at this event, in the order the engine listed them.
    #[must_use]
    pub fn live_vars(&self) -> &[LiveVar] {
        &self.live_vars
    }

    /// Finds a live variable by name.
    #[must_use]
    pub fn live_var(&self, name: &str) -> Option<&LiveVar> {
        self.live_vars.iter().find(|v| v.name.as_ref() == name)
    }
}
