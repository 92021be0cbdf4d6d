//! A small execution engine to debug.
//!
//! Runs one built-in nondeterministic program and reports every port it
//! passes to a [`TraceHook`]:
//!
//! ```text
//! main :-
//!     (   between(From, To, X),
//!         even(X),
//!         \+ greater(X, Limit),
//!         divide(Dividend, X, Q),
//!         record(Q),
//!         fail
//!     ;   true
//!     ).
//!
//! even(X)       :- ( X mod 2 = 0 -> true ; fail ).
//! divide(A, B, Q) :- ( B = 0 -> throw(software_error("division by zero")) ; Q = A // B ).
//! ```
//!
//! Bindings live on a [`Heap`]. Backtracking into `between/3` reclaims
//! everything allocated since its previous solution, so handles taken
//! before the backtrack dangle afterwards.

use std::sync::Arc;

use stepwise_debug::{ExecutionEvent, Port};
use stepwise_foundation::{Error, ErrorKind, Heap, Result, Term, TypeInfo, Word};
use tracing::{debug, info};

// =============================================================================
// Hook and Outcome
// =============================================================================

/// What the engine should do after reporting an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Carry on.
    Proceed,
    /// Stop executing immediately.
    Abort,
}

/// Receives every event the engine produces.
pub trait TraceHook {
    /// Called once per event, in order. `heap` holds the values the event's
    /// live variables point to.
    ///
    /// # Errors
    ///
    /// An error ends the run and is returned from [`Engine::run`].
    fn on_event(&mut self, event: &ExecutionEvent, heap: &Heap) -> Result<Control>;
}

impl<F> TraceHook for F
where
    F: FnMut(&ExecutionEvent, &Heap) -> Result<Control>,
{
    fn on_event(&mut self, event: &ExecutionEvent, heap: &Heap) -> Result<Control> {
        self(event, heap)
    }
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// `main/0` succeeded; holds the recorded quotients in order.
    Succeeded(Vec<Term>),
    /// An exception escaped `main/0`.
    Exception(Term),
    /// The hook asked to stop.
    Aborted,
    /// The event limit was reached.
    EventLimit,
}

// =============================================================================
// Program
// =============================================================================

/// Parameters of the built-in program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Program {
    /// Lower bound for `between/3`.
    pub from: i64,
    /// Upper bound for `between/3`.
    pub to: i64,
    /// Values greater than this are rejected.
    pub limit: i64,
    /// Dividend for `divide/3`.
    pub dividend: i64,
}

impl Default for Program {
    fn default() -> Self {
        Self {
            from: 1,
            to: 6,
            limit: 4,
            dividend: 12,
        }
    }
}

impl Program {
    /// Builder method to set the range of `between/3`.
    #[must_use]
    pub const fn with_range(mut self, from: i64, to: i64) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Builder method to set the limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Builder method to set the dividend.
    #[must_use]
    pub const fn with_dividend(mut self, dividend: i64) -> Self {
        self.dividend = dividend;
        self
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Why execution is unwinding.
enum Unwind {
    Exception(Term),
    Aborted,
    EventLimit,
    Failed(Error),
}

impl From<Error> for Unwind {
    fn from(e: Error) -> Self {
        Self::Failed(e)
    }
}

type Step<T> = std::result::Result<T, Unwind>;

#[derive(Clone)]
struct Frame {
    procedure: Arc<str>,
    depth: u32,
    seqno: u64,
}

type Binding<'a> = (&'a str, Word);

/// Runs the built-in program, reporting to a hook.
pub struct Engine<H: TraceHook> {
    program: Program,
    hook: H,
    heap: Heap,
    event_number: u64,
    last_seqno: u64,
    max_events: Option<u64>,
}

impl<H: TraceHook> Engine<H> {
    /// Creates an engine for `program`.
    #[must_use]
    pub fn new(program: Program, hook: H) -> Self {
        Self {
            program,
            hook,
            heap: Heap::new(),
            event_number: 0,
            last_seqno: 0,
            max_events: None,
        }
    }

    /// Builder method to stop after `limit` events.
    #[must_use]
    pub fn with_max_events(mut self, limit: u64) -> Self {
        self.max_events = Some(limit);
        self
    }

    /// The hook.
    #[must_use]
    pub const fn hook(&self) -> &H {
        &self.hook
    }

    /// Mutable access to the hook.
    pub fn hook_mut(&mut self) -> &mut H {
        &mut self.hook
    }

    /// Consumes the engine, returning the hook.
    #[must_use]
    pub fn into_hook(self) -> H {
        self.hook
    }

    /// The engine heap.
    #[must_use]
    pub const fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Number of events produced so far.
    #[must_use]
    pub const fn events(&self) -> u64 {
        self.event_number
    }

    /// Runs `main/0` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the hook fails or the heap is misused.
    pub fn run(&mut self) -> Result<Outcome> {
        info!(program = ?self.program, "running main/0");
        let outcome = match self.main() {
            Ok(results) => Outcome::Succeeded(results),
            Err(Unwind::Exception(term)) => Outcome::Exception(term),
            Err(Unwind::Aborted) => Outcome::Aborted,
            Err(Unwind::EventLimit) => Outcome::EventLimit,
            Err(Unwind::Failed(e)) => return Err(e),
        };
        info!(events = self.event_number, ?outcome, "run finished");
        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Event plumbing
    // -------------------------------------------------------------------------

    fn enter(&mut self, procedure: &str, depth: u32, args: &[Binding<'_>]) -> Step<Frame> {
        self.last_seqno += 1;
        let frame = Frame {
            procedure: Arc::from(procedure),
            depth,
            seqno: self.last_seqno,
        };
        self.port(&frame, Port::Call, args)?;
        Ok(frame)
    }

    fn port(&mut self, frame: &Frame, port: Port, vars: &[Binding<'_>]) -> Step<()> {
        if self.max_events.is_some_and(|max| self.event_number >= max) {
            debug!(events = self.event_number, "event limit reached");
            return Err(Unwind::EventLimit);
        }
        self.event_number += 1;

        let event = vars.iter().fold(
            ExecutionEvent::new(self.event_number, port, frame.depth, frame.seqno)
                .with_procedure(Arc::clone(&frame.procedure)),
            |event, (name, word)| event.with_var(name, TypeInfo::Int, *word),
        );

        match self.hook.on_event(&event, &self.heap)? {
            Control::Proceed => Ok(()),
            Control::Abort => Err(Unwind::Aborted),
        }
    }

    fn int(&mut self, n: i64) -> Step<Word> {
        Ok(self.heap.alloc_int(n)?)
    }

    fn value_of(&self, word: Word) -> Step<i64> {
        self.heap
            .materialize(word)?
            .as_int()
            .ok_or_else(|| {
                Unwind::Failed(Error::new(ErrorKind::Internal(format!(
                    "expected an integer at {word}"
                ))))
            })
    }

    // -------------------------------------------------------------------------
    // Procedures
    // -------------------------------------------------------------------------

    fn main(&mut self) -> Step<Vec<Term>> {
        let main = self.enter("main/0", 1, &[])?;
        let mut results = Vec::new();

        self.port(&main, Port::Disj, &[])?;
        let lo = self.int(self.program.from)?;
        let hi = self.int(self.program.to)?;
        let between = self.enter("between/3", 2, &[("Lo", lo), ("Hi", hi)])?;

        // `None` once the range is used up, including past `i64::MAX`.
        let mut next = Some(self.program.from);
        let mut retry = None;
        loop {
            if let Some(mark) = retry.take() {
                self.heap.reclaim(mark);
                self.port(&between, Port::Redo, &[("Lo", lo), ("Hi", hi)])?;
            }
            let Some(value) = next.filter(|n| *n <= self.program.to) else {
                self.port(&between, Port::Fail, &[("Lo", lo), ("Hi", hi)])?;
                break;
            };

            retry = Some(self.heap.mark());
            let x = self.int(value)?;
            next = value.checked_add(1);
            self.port(&between, Port::Exit, &[("Lo", lo), ("Hi", hi), ("X", x)])?;

            if !self.even(x)? {
                continue;
            }
            if !self.not_greater(&main, x)? {
                continue;
            }
            let q = match self.divide(x) {
                Ok(q) => q,
                Err(Unwind::Exception(term)) => {
                    self.port(&main, Port::Exception, &[("X", x)])?;
                    return Err(Unwind::Exception(term));
                }
                Err(other) => return Err(other),
            };
            let quotient = self.heap.materialize(q)?;
            debug!(%quotient, "recorded");
            results.push(quotient);
        }

        self.port(&main, Port::Disj, &[])?;
        self.port(&main, Port::Exit, &[])?;
        Ok(results)
    }

    fn even(&mut self, x: Word) -> Step<bool> {
        let frame = self.enter("even/1", 2, &[("X", x)])?;
        self.port(&frame, Port::Cond, &[("X", x)])?;
        if self.value_of(x)?.rem_euclid(2) == 0 {
            self.port(&frame, Port::Then, &[("X", x)])?;
            self.port(&frame, Port::Exit, &[("X", x)])?;
            Ok(true)
        } else {
            self.port(&frame, Port::Else, &[("X", x)])?;
            self.port(&frame, Port::Fail, &[("X", x)])?;
            Ok(false)
        }
    }

    /// `\+ greater(X, Limit)`, run inside `main/0`.
    fn not_greater(&mut self, main: &Frame, x: Word) -> Step<bool> {
        self.port(main, Port::NegEnter, &[("X", x)])?;
        let mark = self.heap.mark();
        let limit = self.int(self.program.limit)?;
        let frame = self.enter("greater/2", 2, &[("X", x), ("Y", limit)])?;
        let greater = self.value_of(x)? > self.program.limit;
        if greater {
            self.port(&frame, Port::Exit, &[("X", x), ("Y", limit)])?;
        } else {
            self.port(&frame, Port::Fail, &[("X", x), ("Y", limit)])?;
        }
        self.heap.reclaim(mark);

        if greater {
            self.port(main, Port::NegFailure, &[("X", x)])?;
        } else {
            self.port(main, Port::NegSuccess, &[("X", x)])?;
        }
        Ok(!greater)
    }

    fn divide(&mut self, divisor: Word) -> Step<Word> {
        let a = self.int(self.program.dividend)?;
        let frame = self.enter("divide/3", 2, &[("A", a), ("B", divisor)])?;
        self.port(&frame, Port::Switch, &[("A", a), ("B", divisor)])?;

        let b = self.value_of(divisor)?;
        let Some(q) = self.program.dividend.checked_div(b) else {
            let reason = if b == 0 {
                "division by zero"
            } else {
                "integer overflow"
            };
            self.port(&frame, Port::Exception, &[("A", a), ("B", divisor)])?;
            return Err(Unwind::Exception(Term::compound(
                "software_error",
                vec![Term::string(reason)],
            )));
        };

        let q = self.int(q)?;
        self.port(&frame, Port::Exit, &[("A", a), ("B", divisor), ("Q", q)])?;
        Ok(q)
    }
}

// =============================================================================
// Tests
// =============================================================================
