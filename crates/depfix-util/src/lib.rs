//! Shared utilities for depfix.
//!
//! This crate provides cross-cutting concerns used by all other depfix crates:
//! the unified error type, filesystem helpers, external process spawning, and
//! terminal status and progress indicators.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
