//! Operations behind each `depfix` command.
//!
//! Every operation takes an explicit [`context::Context`] carrying the
//! configuration and the collaborators it talks to (package index,
//! environment inspector, installer). Results are returned to the caller for
//! rendering; only progress lines go to stderr.

pub mod context;
pub mod environment;
pub mod ops_fix;
pub mod ops_graph;
pub mod ops_lock;
pub mod ops_outdated;
pub mod ops_restore;
pub mod ops_scan;

#[cfg(test)]
pub(crate) mod fakes;
