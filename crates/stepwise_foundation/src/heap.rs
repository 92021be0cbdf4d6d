//! The engine's reclaimable value heap.
//!
//! Working values live here while the program runs. The heap behaves like a
//! stack that backtracking rewinds: [`Heap::mark`] records the current top and
//! [`Heap::reclaim`] discards everything allocated after it. A [`Word`] that
//! pointed into discarded storage is dangling from then on, even when its
//! slot is later reused, because every allocation carries a fresh stamp.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::Result;
use crate::error::Error;
use crate::term::Term;

/// Handle to a heap cell.
///
/// Handles are cheap to copy and say nothing about whether the cell is
/// still alive; reading through [`Heap::read`] checks that.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Word {
    slot: u32,
    stamp: u64,
}

impl Word {
    /// Returns the slot index this handle points at.
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}#{}", self.slot, self.stamp)
    }
}

/// A position on the heap to rewind to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HeapMark(usize);

/// One heap cell. Compound cells refer to their arguments by handle.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Unicode character.
    Char(char),
    /// String.
    Str(Arc<str>),
    /// A functor applied to heap-resident arguments.
    Compound {
        /// Functor name.
        functor: Arc<str>,
        /// Argument handles.
        args: Vec<Word>,
    },
}

#[derive(Clone, Debug)]
struct Slot {
    stamp: u64,
    cell: Cell,
}

/// Stack-disciplined heap with stamp-checked handles.
#[derive(Clone, Debug, Default)]
pub struct Heap {
    slots: Vec<Slot>,
    next_stamp: u64,
}

impl Heap {
    /// Creates an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no cells are allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocates a cell.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DanglingHandle`](crate::ErrorKind::DanglingHandle)
    /// if a compound cell names an argument that is no longer live.
    pub fn alloc(&mut self, cell: Cell) -> Result<Word> {
        if let Cell::Compound { args, .. } = &cell {
            if let Some(dead) = args.iter().find(|w| !self.is_live(**w)) {
                return Err(Error::dangling(*dead));
            }
        }
        let slot = u32::try_from(self.slots.len())
            .map_err(|_| Error::new(crate::ErrorKind::Internal("heap exhausted".into())))?;
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.slots.push(Slot { stamp, cell });
        Ok(Word { slot, stamp })
    }

    /// Allocates an integer cell.
    ///
    /// # Errors
    ///
    /// Fails only if the heap is exhausted.
    pub fn alloc_int(&mut self, n: i64) -> Result<Word> {
        self.alloc(Cell::Int(n))
    }

    /// Copies an owned term onto the heap, arguments first.
    ///
    /// # Errors
    ///
    /// Fails only if the heap is exhausted.
    pub fn store(&mut self, term: &Term) -> Result<Word> {
        let cell = match term {
            Term::Int(n) => Cell::Int(*n),
            Term::Float(n) => Cell::Float(*n),
            Term::Char(c) => Cell::Char(*c),
            Term::Str(s) => Cell::Str(Arc::clone(s)),
            Term::Compound { functor, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.store(arg))
                    .collect::<Result<Vec<_>>>()?;
                Cell::Compound {
                    functor: Arc::clone(functor),
                    args,
                }
            }
        };
        self.alloc(cell)
    }

    /// Returns true if the handle still refers to the cell it was issued for.
    #[must_use]
    pub fn is_live(&self, word: Word) -> bool {
        self.slots
            .get(word.slot as usize)
            .is_some_and(|slot| slot.stamp == word.stamp)
    }

    /// Reads a cell.
    ///
    /// # Errors
    ///
    /// Returns a dangling-handle error if the cell was reclaimed.
    pub fn read(&self, word: Word) -> Result<&Cell> {
        self.slots
            .get(word.slot as usize)
            .filter(|slot| slot.stamp == word.stamp)
            .map(|slot| &slot.cell)
            .ok_or_else(|| Error::dangling(word))
    }

    /// Copies a heap value out into an owned term.
    ///
    /// # Errors
    ///
    /// Returns a dangling-handle error if the value or any part of it was
    /// reclaimed.
    pub fn materialize(&self, word: Word) -> Result<Term> {
        Ok(match self.read(word)? {
            Cell::Int(n) => Term::Int(*n),
            Cell::Float(n) => Term::Float(*n),
            Cell::Char(c) => Term::Char(*c),
            Cell::Str(s) => Term::Str(Arc::clone(s)),
            Cell::Compound { functor, args } => Term::Compound {
                functor: Arc::clone(functor),
                args: args
                    .iter()
                    .map(|arg| self.materialize(*arg))
                    .collect::<Result<Vec<_>>>()?,
            },
        })
    }

    /// Records the current top of the heap.
    #[must_use]
    pub fn mark(&self) -> HeapMark {
        HeapMark(self.slots.len())
    }

    /// Discards every cell allocated after `mark`.
    pub fn reclaim(&mut self, mark: HeapMark) {
        if mark.0 < self.slots.len() {
            trace!(
                from = self.slots.len(),
                to = mark.0,
                "reclaiming heap cells"
            );
            self.slots.truncate(mark.0);
        }
    }
}
