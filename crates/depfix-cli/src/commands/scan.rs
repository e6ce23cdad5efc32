//! Handler for `depfix scan`.

use miette::Result;
use serde::Serialize;

use depfix_ops::context::Context;
use depfix_ops::ops_scan;
use depfix_resolver::conflict::Conflict;
use depfix_util::progress;

use super::{print_json, EXIT_CONFLICTS, EXIT_SUCCESS};

#[derive(Serialize)]
struct ScanOutput<'a> {
    action: &'static str,
    conflict_count: usize,
    conflicts: &'a [Conflict],
}

pub fn exec(ctx: &Context, json: bool) -> Result<u8> {
    progress::status_info("Scanning", "for dependency conflicts...");
    let report = ops_scan::scan(ctx)?;

    if json {
        print_json(&ScanOutput {
            action: "scan",
            conflict_count: report.len(),
            conflicts: &report.conflicts,
        })?;
    } else {
        println!("{}", report.to_string().trim_end());
    }

    Ok(if report.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_CONFLICTS
    })
}
