//! Integration tests across all layers
//!
//! Runs the debugger over the built-in engine with scripted operator input.

mod batch;
