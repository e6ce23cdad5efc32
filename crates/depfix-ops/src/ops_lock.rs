//! Operation: pin the current environment into a lock file.

use std::path::Path;

use depfix_core::lockfile::Lockfile;

use crate::context::Context;

/// Write every installed `name==version` pair to `output`.
///
/// Returns the lock that was written.
pub fn lock(ctx: &Context, output: &Path) -> miette::Result<Lockfile> {
    tracing::info!("Locking current environment...");
    let freeze = ctx.environment.freeze()?;
    let lockfile = Lockfile::from_freeze(&freeze);
    lockfile.write_to(output)?;
    tracing::info!("Environment locked to {}", output.display());
    Ok(lockfile)
}
