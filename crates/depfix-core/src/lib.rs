//! Core data types for depfix.
//!
//! This crate defines the types shared by every other depfix crate: package
//! name normalisation, the strongly typed installed-package tree produced by
//! the environment inspector, the lock file format, and configuration.
//!
//! This crate is intentionally free of network I/O.

pub mod config;
pub mod lockfile;
pub mod name;
pub mod tree;
