//! Operation: export the installed dependency graph.

use depfix_resolver::export;
use depfix_resolver::graph::PackageRegistry;
use depfix_util::errors::DepfixError;
use depfix_util::progress;

use crate::context::Context;
use crate::ops_scan;

/// Output form of `depfix graph`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    /// Structured name-keyed JSON.
    #[default]
    Json,
    /// DOT edge list.
    Dot,
}

/// Options for `depfix graph`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphOptions {
    pub format: GraphFormat,
    /// Attach index metadata to every node (JSON form only).
    pub with_index: bool,
}

/// Render the current environment's graph.
pub fn graph(ctx: &Context, opts: &GraphOptions) -> miette::Result<String> {
    let mut registry = ops_scan::load_registry(ctx)?;
    match opts.format {
        GraphFormat::Dot => {
            if opts.with_index {
                tracing::warn!("--with-index has no effect on DOT output");
            }
            Ok(export::to_edge_list(&registry))
        }
        GraphFormat::Json => {
            if opts.with_index {
                attach_index_metadata(ctx, &mut registry)?;
            }
            Ok(export::to_json(&registry)?)
        }
    }
}

/// Fetch and attach metadata for every node. Lookup failures leave the node
/// without metadata.
fn attach_index_metadata(ctx: &Context, registry: &mut PackageRegistry) -> miette::Result<()> {
    let names: Vec<String> = registry.nodes().map(|n| n.name.clone()).collect();
    let sp = progress::spinner("Fetching package metadata...");
    for name in names {
        if ctx.is_interrupted() {
            sp.finish_and_clear();
            return Err(DepfixError::Interrupted.into());
        }
        sp.set_message(format!("Fetching {name}"));
        match ctx.index.project(&name) {
            Ok(Some(meta)) => registry.attach_metadata(&name, meta),
            Ok(None) => tracing::debug!(package = %name, "not on index"),
            Err(e) => tracing::warn!("{e}"),
        }
    }
    sp.finish_and_clear();
    Ok(())
}
