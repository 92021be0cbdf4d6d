//! Stepwise - execution-trace stepping for a logic-program debugger
//!
//! This crate re-exports all layers of the Stepwise system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: stepwise_runtime    - Demo engine, debugger loop, CLI
//! Layer 1: stepwise_debug      - Trace commands, spy points, held variables, console
//! Layer 0: stepwise_foundation - Terms, type descriptors, heap, permanent arena, errors
//! ```

pub use stepwise_debug as debug;
pub use stepwise_foundation as foundation;
pub use stepwise_runtime as runtime;
