//! Package index protocol: the [`client::PackageIndex`] seam, a blocking
//! JSON-API client, per-run metadata caching, and requirement-text parsing.

pub mod cache;
pub mod client;
pub mod metadata;
pub mod requirement;
