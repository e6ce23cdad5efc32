//! Handler for `depfix lock`.

use std::path::PathBuf;

use miette::Result;
use serde::Serialize;

use depfix_ops::context::Context;
use depfix_ops::ops_lock;
use depfix_util::progress;

use super::{print_json, EXIT_SUCCESS};

#[derive(Serialize)]
struct LockOutput {
    action: &'static str,
    path: PathBuf,
    package_count: usize,
}

pub fn exec(ctx: &Context, json: bool, output: Option<PathBuf>) -> Result<u8> {
    let path = output.unwrap_or_else(|| ctx.config.lock.path.clone());
    let lockfile = ops_lock::lock(ctx, &path)?;

    if json {
        print_json(&LockOutput {
            action: "lock",
            package_count: lockfile.len(),
            path,
        })?;
    } else {
        progress::status(
            "Locked",
            &format!("{} packages to {}", lockfile.len(), path.display()),
        );
    }
    Ok(EXIT_SUCCESS)
}
