//! Session-lifetime storage.
//!
//! The [`PermanentArena`] is a separate allocator from the engine [`Heap`].
//! Whatever is promoted into it stays readable for the rest of the debugging
//! session: nothing the engine does to its heap can invalidate an arena
//! handle, and the arena never frees anything.

use std::collections::HashMap;

use tracing::trace;

use crate::Result;
use crate::error::{Error, ErrorKind};
use crate::heap::{Heap, Word};
use crate::term::Term;
use crate::types::TypeInfo;

/// Handle to a value promoted into the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueId(u32);

/// Handle to a type descriptor promoted into the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

/// Append-only store for promoted values and type descriptors.
#[derive(Clone, Debug, Default)]
pub struct PermanentArena {
    values: Vec<Term>,
    types: Vec<TypeInfo>,
    type_index: HashMap<TypeInfo, TypeId>,
}

impl PermanentArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-copies a heap value into the arena.
    ///
    /// # Errors
    ///
    /// Returns a dangling-handle error if the value was already reclaimed.
    /// Nothing is stored in that case.
    pub fn promote_value(&mut self, heap: &Heap, word: Word) -> Result<ValueId> {
        let term = heap.materialize(word)?;
        self.adopt(term)
    }

    /// Takes ownership of an already materialized term.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the arena has run out of value handles.
    pub fn adopt(&mut self, term: Term) -> Result<ValueId> {
        let id = ValueId(next_id(self.values.len(), "value")?);
        trace!(id = id.0, size = term.size(), "promoted value");
        self.values.push(term);
        Ok(id)
    }

    /// Copies a type descriptor into the arena.
    ///
    /// Descriptors are interned: promoting an equal descriptor twice yields
    /// the same handle.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the arena has run out of type handles.
    pub fn promote_type(&mut self, ty: &TypeInfo) -> Result<TypeId> {
        if let Some(id) = self.type_index.get(ty) {
            return Ok(*id);
        }
        let id = TypeId(next_id(self.types.len(), "type")?);
        self.types.push(ty.clone());
        self.type_index.insert(ty.clone(), id);
        Ok(id)
    }

    /// Reads a promoted value.
    ///
    /// # Panics
    ///
    /// Panics if the handle was issued by a different arena.
    #[must_use]
    pub fn value(&self, id: ValueId) -> &Term {
        &self.values[id.0 as usize]
    }

    /// Reads a promoted type descriptor.
    ///
    /// # Panics
    ///
    /// Panics if the handle was issued by a different arena.
    #[must_use]
    pub fn type_info(&self, id: TypeId) -> &TypeInfo {
        &self.types[id.0 as usize]
    }

    /// Number of promoted values.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Number of distinct promoted type descriptors.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

/// Handle number for the next entry of a table holding `len` entries.
fn next_id(len: usize, table: &str) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| Error::new(ErrorKind::Internal(format!("permanent {table} table exhausted"))))
}
