//! Integration tests for Layer 1: Debug
//!
//! Tests for the held variable store, stepping commands, and the operator
//! session.

mod commands;
mod held;
mod session;
