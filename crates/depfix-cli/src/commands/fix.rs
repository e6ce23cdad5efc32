//! Handler for `depfix fix`.

use miette::Result;
use serde::Serialize;

use depfix_ops::context::Context;
use depfix_ops::ops_fix::{self, Applied, ApplyReport, FixOptions, FixPlan};
use depfix_resolver::resolver::{Resolution, Unresolved};
use depfix_util::progress;

use super::{print_json, EXIT_CONFLICTS, EXIT_FAILURE, EXIT_SUCCESS};

#[derive(Serialize)]
struct FixOutput<'a> {
    action: &'static str,
    conflict_count: usize,
    resolutions: &'a [Resolution],
    unresolved: &'a [Unresolved],
    dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<&'a [Applied]>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    not_attempted: &'a [String],
    interrupted: bool,
}

pub fn exec(ctx: &Context, json: bool, yes: bool, dry_run: bool) -> Result<u8> {
    let opts = FixOptions { yes, dry_run };
    progress::status_info("Fixing", "dependency conflicts...");
    let fix = ops_fix::plan(ctx)?;

    let emit = |applied: Option<&ApplyReport>| -> Result<()> {
        if json {
            print_json(&output(&fix, opts.dry_run, applied))?;
        }
        Ok(())
    };

    if fix.report.is_empty() {
        emit(None)?;
        progress::status("Finished", "no conflicts to fix");
        return Ok(EXIT_SUCCESS);
    }

    if !json {
        println!("{}", fix.report);
        print!("{}", fix.plan);
    }

    if fix.plan.is_empty() {
        emit(None)?;
        progress::status_error("Error", "no compatible resolutions found");
        return Ok(EXIT_CONFLICTS);
    }

    if opts.dry_run {
        emit(None)?;
        progress::status_info("Dry run", "skipping package changes");
        return Ok(EXIT_SUCCESS);
    }

    if !opts.yes && !ops_fix::confirm(fix.plan.resolutions.len())? {
        emit(None)?;
        progress::status_warn("Cancelled", "fix application cancelled");
        return Ok(EXIT_SUCCESS);
    }

    let report = ops_fix::apply(ctx, &fix.plan);
    emit(Some(&report))?;

    if report.interrupted {
        let detail = match report.in_flight() {
            Some(a) if a.succeeded() => format!("after updating {}", a.package),
            Some(a) => format!("while updating {}", a.package),
            None => "before any package was updated".to_string(),
        };
        progress::status_warn("Cancelled", &format!("interrupted {detail}"));
        if !report.not_attempted.is_empty() {
            progress::status_warn("Skipped", &report.not_attempted.join(", "));
        }
        Ok(EXIT_FAILURE)
    } else if report.all_succeeded() {
        progress::status("Finished", "all fixes applied successfully");
        Ok(EXIT_SUCCESS)
    } else {
        progress::status_error("Error", "some fixes failed; check logs for details");
        Ok(EXIT_FAILURE)
    }
}

fn output<'a>(fix: &'a FixPlan, dry_run: bool, report: Option<&'a ApplyReport>) -> FixOutput<'a> {
    FixOutput {
        action: "fix",
        conflict_count: fix.report.len(),
        resolutions: &fix.plan.resolutions,
        unresolved: &fix.plan.unresolved,
        dry_run,
        applied: report.map(|r| r.applied.as_slice()),
        not_attempted: report.map_or(&[][..], |r| r.not_attempted.as_slice()),
        interrupted: report.is_some_and(|r| r.interrupted),
    }
}
