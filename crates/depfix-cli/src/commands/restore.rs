//! Handler for `depfix restore`.

use std::path::PathBuf;

use miette::Result;

use depfix_ops::context::Context;
use depfix_ops::ops_restore;
use depfix_util::progress;

use super::EXIT_SUCCESS;

pub fn exec(ctx: &Context, file: Option<PathBuf>) -> Result<u8> {
    let path = file.unwrap_or_else(|| ctx.config.lock.path.clone());
    match ops_restore::restore(ctx, &path)? {
        0 => progress::status_info("Restore", "lock file is empty; nothing to install"),
        n => progress::status("Restored", &format!("{n} packages from {}", path.display())),
    }
    Ok(EXIT_SUCCESS)
}
