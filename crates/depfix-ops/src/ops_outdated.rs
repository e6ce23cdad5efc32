//! Operation: list installed packages with newer releases on the index.

use serde::Serialize;

use depfix_resolver::version;
use depfix_util::errors::DepfixError;
use depfix_util::progress;

use crate::context::Context;
use crate::ops_scan;

/// An installed package with a newer final release available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutdatedEntry {
    pub name: String,
    pub version: String,
    pub latest_version: String,
}

/// Compare every installed package with the newest non-prerelease release on
/// the index.
///
/// Packages the index does not know, or cannot be reached for, are skipped.
pub fn outdated(ctx: &Context) -> miette::Result<Vec<OutdatedEntry>> {
    let registry = ops_scan::load_registry(ctx)?;
    let sp = progress::spinner("Checking for outdated packages...");

    let mut entries = Vec::new();
    for node in registry.nodes() {
        if ctx.is_interrupted() {
            sp.finish_and_clear();
            return Err(DepfixError::Interrupted.into());
        }
        let installed = match version::parse_version(&node.version) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(package = %node.name, "skipping: {e}");
                continue;
            }
        };
        sp.set_message(format!("Checking {}", node.name));
        let available = match ctx.index.available_versions(&node.name) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{e}");
                continue;
            }
        };
        if let Some(latest) = version::newest_release(&available) {
            if latest > installed {
                entries.push(OutdatedEntry {
                    name: node.name.clone(),
                    version: node.version.clone(),
                    latest_version: latest.to_string(),
                });
            }
        }
    }

    sp.finish_and_clear();
    Ok(entries)
}
