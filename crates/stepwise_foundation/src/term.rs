//! Owned term values.
//!
//! A [`Term`] is a self-contained tree. The engine keeps its working values
//! on a [`Heap`](crate::Heap) instead; terms are what you get when a heap
//! value is copied out, and what the permanent arena stores.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fully materialized value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Unicode character.
    Char(char),
    /// String.
    Str(Arc<str>),
    /// A functor applied to arguments. Constants have no arguments.
    Compound {
        /// Functor name.
        functor: Arc<str>,
        /// Arguments in order.
        args: Vec<Term>,
    },
}

impl Term {
    /// Functor of a non-empty list cell.
    pub const CONS: &'static str = "[|]";
    /// Functor of the empty list.
    pub const NIL: &'static str = "[]";

    /// Creates a string term.
    #[must_use]
    pub fn string(s: &str) -> Self {
        Self::Str(Arc::from(s))
    }

    /// Creates a compound term.
    #[must_use]
    pub fn compound(functor: &str, args: Vec<Term>) -> Self {
        Self::Compound {
            functor: Arc::from(functor),
            args,
        }
    }

    /// Creates a constant (a functor with no arguments).
    #[must_use]
    pub fn atom(name: &str) -> Self {
        Self::compound(name, Vec::new())
    }

    /// Builds a list term from its elements.
    #[must_use]
    pub fn list(items: Vec<Term>) -> Self {
        items
            .into_iter()
            .rev()
            .fold(Self::atom(Self::NIL), |tail, head| {
                Self::compound(Self::CONS, vec![head, tail])
            })
    }

    /// Returns true if this term is a list cell or the empty list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        match self {
            Self::Compound { functor, args } => {
                (functor.as_ref() == Self::NIL && args.is_empty())
                    || (functor.as_ref() == Self::CONS && args.len() == 2)
            }
            _ => false,
        }
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Compound { args, .. } => 1 + args.iter().map(Self::size).sum::<usize>(),
            _ => 1,
        }
    }

    /// Collects the elements of a proper list, or `None` for anything else.
    fn list_items(&self) -> Option<Vec<&Term>> {
        let mut items = Vec::new();
        let mut cursor = self;
        loop {
            match cursor {
                Self::Compound { functor, args } if functor.as_ref() == Self::NIL && args.is_empty() => {
                    return Some(items);
                }
                Self::Compound { functor, args } if functor.as_ref() == Self::CONS && args.len() == 2 => {
                    items.push(&args[0]);
                    cursor = &args[1];
                }
                _ => return None,
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::Char(c) => write!(f, "'{c}'"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Compound { functor, args } => {
                if let Some(items) = self.list_items() {
                    write!(f, "[")?;
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{item}")?;
                    }
                    return write!(f, "]");
                }
                write!(f, "{functor}")?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}
