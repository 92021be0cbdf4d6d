//! Held variables.
//!
//! The operator can keep a value from one event around for inspection at
//! later events. Values handed to the store point into the engine heap,
//! which backtracking rewinds, so the store copies both the value and its
//! type descriptor into its own [`PermanentArena`] on insertion and never
//! reads the heap again.
//!
//! Entries are kept in a vector sorted by name: lookups are a binary search
//! and insertions shift the tail. Held variables are added by hand, one at a
//! time, so the tables stay small.

use std::fmt::Write as _;

use stepwise_foundation::{Heap, PermanentArena, Result, Term, TypeId, TypeInfo, ValueId, Word};
use tracing::debug;

/// Initial number of slots in the table.
pub const INITIAL_HELD_CAPACITY: usize = 10;

#[derive(Clone, Debug)]
struct HeldVar {
    name: Box<str>,
    type_id: TypeId,
    value_id: ValueId,
}

/// A held variable as seen through [`HeldVariableStore::lookup`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeldValue<'a> {
    /// The variable's name, without the `$` marker.
    pub name: &'a str,
    /// The promoted type descriptor.
    pub type_info: &'a TypeInfo,
    /// The promoted value.
    pub value: &'a Term,
}

/// Sorted table of held variables with session-lifetime storage.
#[derive(Clone, Debug)]
pub struct HeldVariableStore {
    entries: Vec<HeldVar>,
    arena: PermanentArena,
}

impl HeldVariableStore {
    /// Creates an empty store with the default initial capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_HELD_CAPACITY)
    }

    /// Creates an empty store with room for `capacity` entries before the
    /// first reallocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.max(1)),
            arena: PermanentArena::new(),
        }
    }

    /// Number of held variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current table capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// The arena holding promoted values.
    #[must_use]
    pub const fn arena(&self) -> &PermanentArena {
        &self.arena
    }

    fn search(&self, name: &str) -> std::result::Result<usize, usize> {
        self.entries
            .binary_search_by(|entry| entry.name.as_ref().cmp(name))
    }

    fn grow_if_full(&mut self) {
        if self.entries.len() == self.entries.capacity() {
            let additional = self.entries.capacity().max(1);
            self.entries.reserve_exact(additional);
        }
    }

    fn insert_at(&mut self, slot: usize, name: &str, type_id: TypeId, value_id: ValueId) {
        self.grow_if_full();
        self.entries.insert(
            slot,
            HeldVar {
                name: Box::from(name),
                type_id,
                value_id,
            },
        );
        debug!(name, held = self.entries.len(), "held variable added");
    }

    /// Holds a heap value under `name`.
    ///
    /// Returns `Ok(false)` without touching the table if `name` is already
    /// held. Otherwise the value and its type are promoted into permanent
    /// storage and the entry is inserted in name order.
    ///
    /// # Errors
    ///
    /// Returns a dangling-handle error if `value` was already reclaimed; the
    /// table is unchanged in that case.
    pub fn add(&mut self, name: &str, type_info: &TypeInfo, value: Word, heap: &Heap) -> Result<bool> {
        let Err(slot) = self.search(name) else {
            return Ok(false);
        };
        let value_id = self.arena.promote_value(heap, value)?;
        let type_id = self.arena.promote_type(type_info)?;
        self.insert_at(slot, name, type_id, value_id);
        Ok(true)
    }

    /// Holds an already materialized value under `name`.
    ///
    /// Returns `Ok(false)` without touching the table if `name` is already
    /// held.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the permanent arena is exhausted.
    pub fn add_term(&mut self, name: &str, type_info: &TypeInfo, value: Term) -> Result<bool> {
        let Err(slot) = self.search(name) else {
            return Ok(false);
        };
        let value_id = self.arena.adopt(value)?;
        let type_id = self.arena.promote_type(type_info)?;
        self.insert_at(slot, name, type_id, value_id);
        Ok(true)
    }

    /// Looks up a held variable by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<HeldValue<'_>> {
        let slot = self.search(name).ok()?;
        let entry = &self.entries[slot];
        Some(HeldValue {
            name: &entry.name,
            type_info: self.arena.type_info(entry.type_id),
            value: self.arena.value(entry.value_id),
        })
    }

    /// Returns true if `name` is held.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.search(name).is_ok()
    }

    /// Held variable names in ascending order.
    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_ref())
    }

    /// Renders the names one per line, each prefixed with `$`.
    #[must_use]
    pub fn render_list(&self) -> String {
        let mut out = String::new();
        for name in self.list() {
            let _ = writeln!(out, "${name}");
        }
        out
    }
}

impl Default for HeldVariableStore {
    fn default() -> Self {
        Self::new()
    }
}
