//! Dependency graph model, conflict detection, and version resolution.
//!
//! Data flows raw tree → [`graph::build`] → [`graph::PackageRegistry`] →
//! [`conflict::detect`] → [`resolver::Resolver::resolve`]. The
//! [`export`] module serialises the same registry for introspection.

pub mod conflict;
pub mod export;
pub mod graph;
pub mod resolver;
pub mod version;
