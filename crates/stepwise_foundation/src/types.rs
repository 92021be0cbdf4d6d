//! Type descriptors for traced values.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type descriptor attached to every value the debugger can see.
///
/// The debugger treats descriptors as opaque: it copies them, compares them,
/// and prints them, but never interprets a value through one.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeInfo {
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// Unicode character.
    Char,
    /// String.
    String,
    /// A named type constructor applied to argument types, e.g. `list(int)`.
    Named {
        /// Type constructor name.
        name: Arc<str>,
        /// Argument types.
        args: Vec<TypeInfo>,
    },
}

impl TypeInfo {
    /// Creates a named type with no arguments.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::Named {
            name: Arc::from(name),
            args: Vec::new(),
        }
    }

    /// Creates a named type applied to arguments.
    #[must_use]
    pub fn applied(name: &str, args: Vec<TypeInfo>) -> Self {
        Self::Named {
            name: Arc::from(name),
            args,
        }
    }

    /// Creates `list(element)`.
    #[must_use]
    pub fn list(element: TypeInfo) -> Self {
        Self::applied("list", vec![element])
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Char => write!(f, "character"),
            Self::String => write!(f, "string"),
            Self::Named { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg:?}")?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
