//! Handler for `depfix outdated`.

use miette::Result;
use serde::Serialize;

use depfix_ops::context::Context;
use depfix_ops::ops_outdated::{self, OutdatedEntry};
use depfix_util::progress;

use super::{print_json, EXIT_SUCCESS};

#[derive(Serialize)]
struct OutdatedOutput<'a> {
    action: &'static str,
    updates: &'a [OutdatedEntry],
}

pub fn exec(ctx: &Context, json: bool) -> Result<u8> {
    let entries = ops_outdated::outdated(ctx)?;

    if json {
        print_json(&OutdatedOutput {
            action: "outdated",
            updates: &entries,
        })?;
        return Ok(EXIT_SUCCESS);
    }

    if entries.is_empty() {
        progress::status("Outdated", "all packages are up to date");
        return Ok(EXIT_SUCCESS);
    }

    println!("{:<40} {:<15} Latest", "Package", "Current");
    println!("{}", "-".repeat(70));
    for entry in &entries {
        println!(
            "{:<40} {:<15} {}",
            entry.name, entry.version, entry.latest_version
        );
    }
    Ok(EXIT_SUCCESS)
}
