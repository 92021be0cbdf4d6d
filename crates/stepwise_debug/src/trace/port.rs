//! Execution ports and their categories.
//!
//! Category membership is spelled out per port. Nothing here depends on the
//! declaration order of [`Port`], so ports can be added or reordered
//! without silently changing which category they fall into.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of an execution event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Port {
    /// A procedure invocation starts.
    Call,
    /// A procedure invocation succeeds.
    Exit,
    /// Backtracking re-enters an invocation that already exited.
    Redo,
    /// A procedure invocation fails.
    Fail,
    /// A procedure invocation propagates an exception.
    Exception,
    /// Entry to the condition of an if-then-else.
    Cond,
    /// The condition succeeded; entering the then branch.
    Then,
    /// The condition failed; entering the else branch.
    Else,
    /// Entry to a disjunct.
    Disj,
    /// Entry to a switch arm.
    Switch,
    /// Entry to a negated goal.
    NegEnter,
    /// The negated goal failed, so the negation succeeds.
    NegSuccess,
    /// The negated goal succeeded, so the negation fails.
    NegFailure,
}

/// A named set of ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortCategory {
    /// Ports that start an invocation: `Call`.
    Entry,
    /// Ports that end an invocation: `Exit`, `Fail`, `Exception`.
    Final,
    /// Ports visible at the procedure boundary: `Call`, `Exit`, `Redo`, `Exception`.
    Interface,
    /// Ports reached by failure or unwinding: `Redo`, `Fail`, `Exception`.
    FailureDriven,
}

impl PortCategory {
    /// Returns the members of this category.
    #[must_use]
    pub const fn ports(self) -> &'static [Port] {
        match self {
            Self::Entry => &[Port::Call],
            Self::Final => &[Port::Exit, Port::Fail, Port::Exception],
            Self::Interface => &[Port::Call, Port::Exit, Port::Redo, Port::Exception],
            Self::FailureDriven => &[Port::Redo, Port::Fail, Port::Exception],
        }
    }

    /// Returns true if `port` belongs to this category.
    #[must_use]
    pub fn contains(self, port: Port) -> bool {
        self.ports().contains(&port)
    }
}

impl Port {
    /// Every port, interface ports first.
    pub const ALL: [Port; 13] = [
        Port::Call,
        Port::Exit,
        Port::Redo,
        Port::Fail,
        Port::Exception,
        Port::Cond,
        Port::Then,
        Port::Else,
        Port::Disj,
        Port::Switch,
        Port::NegEnter,
        Port::NegSuccess,
        Port::NegFailure,
    ];

    /// Returns true for `Call`.
    #[must_use]
    pub fn is_entry(self) -> bool {
        PortCategory::Entry.contains(self)
    }

    /// Returns true for `Exit`, `Fail` and `Exception`.
    #[must_use]
    pub fn is_final(self) -> bool {
        PortCategory::Final.contains(self)
    }

    /// Returns true for `Call`, `Exit`, `Redo` and `Exception`.
    #[must_use]
    pub fn is_interface(self) -> bool {
        PortCategory::Interface.contains(self)
    }

    /// Returns true for `Redo`, `Fail` and `Exception`.
    #[must_use]
    pub fn is_failure_driven(self) -> bool {
        PortCategory::FailureDriven.contains(self)
    }

    /// Returns true for ports inside a procedure body.
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(
            self,
            Self::Cond
                | Self::Then
                | Self::Else
                | Self::Disj
                | Self::Switch
                | Self::NegEnter
                | Self::NegSuccess
                | Self::NegFailure
        )
    }

    /// Four-letter name used in summary lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Exit => "EXIT",
            Self::Redo => "REDO",
            Self::Fail => "FAIL",
            Self::Exception => "EXCP",
            Self::Cond => "COND",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::Disj => "DISJ",
            Self::Switch => "SWTC",
            Self::NegEnter => "NEGE",
            Self::NegSuccess => "NEGS",
            Self::NegFailure => "NEGF",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
