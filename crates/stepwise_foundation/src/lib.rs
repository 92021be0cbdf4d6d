//! Terms, type descriptors, and memory for Stepwise.
//!
//! This crate provides:
//! - [`Term`] - Owned, fully materialized values
//! - [`TypeInfo`] - Type descriptors attached to traced values
//! - [`Heap`] - The engine's reclaimable value heap, addressed by [`Word`]
//! - [`PermanentArena`] - Session-lifetime storage that survives reclamation
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod error;
pub mod heap;
pub mod term;
pub mod types;

pub use arena::{PermanentArena, TypeId, ValueId};
pub use error::{Error, ErrorContext, ErrorKind};
pub use heap::{Cell, Heap, HeapMark, Word};
pub use term::Term;
pub use types::TypeInfo;

/// Result type alias using the Stepwise error type.
pub type Result<T> = std::result::Result<T, Error>;
