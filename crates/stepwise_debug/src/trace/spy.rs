//! Spy points.
//!
//! The tracer treats spy-point matching as an opaque predicate. The
//! implementations here match on exact procedure names; richer pattern
//! languages plug in through [`SpyMatcher`].

use std::collections::BTreeMap;

use super::event::ExecutionEvent;

/// Predicate over events supplied by the spy-point subsystem.
pub trait SpyMatcher {
    /// Returns true if any spy point matches the event.
    fn matches(&self, event: &ExecutionEvent) -> bool;

    /// Returns true if a matching spy point asks execution to stop.
    ///
    /// Only consulted for non-strict commands.
    fn stops_at(&self, event: &ExecutionEvent) -> bool {
        let _ = event;
        false
    }
}

/// A matcher with no spy points.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSpyPoints;

impl SpyMatcher for NoSpyPoints {
    fn matches(&self, _event: &ExecutionEvent) -> bool {
        false
    }
}

/// What a spy point does when it matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpyAction {
    /// Stop execution (unless the command is strict).
    Stop,
    /// Only print a summary line (when the print level allows).
    Print,
}

/// Spy points keyed by exact procedure name.
#[derive(Clone, Debug, Default)]
pub struct ProcedureSpyPoints {
    points: BTreeMap<String, SpyAction>,
}

impl ProcedureSpyPoints {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a spy point.
    pub fn insert(&mut self, procedure: impl Into<String>, action: SpyAction) {
        self.points.insert(procedure.into(), action);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, procedure: impl Into<String>, action: SpyAction) -> Self {
        self.insert(procedure, action);
        self
    }

    /// Removes a spy point, returning whether one existed.
    pub fn remove(&mut self, procedure: &str) -> bool {
        self.points.remove(procedure).is_some()
    }

    /// Number of spy points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no spy points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over spy points in procedure-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SpyAction)> {
        self.points.iter().map(|(name, action)| (name.as_str(), *action))
    }
}

impl SpyMatcher for ProcedureSpyPoints {
    fn matches(&self, event: &ExecutionEvent) -> bool {
        self.points.contains_key(event.procedure())
    }

    fn stops_at(&self, event: &ExecutionEvent) -> bool {
        self.points.get(event.procedure()) == Some(&SpyAction::Stop)
    }
}
