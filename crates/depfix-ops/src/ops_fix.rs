//! Operation: resolve conflicts and apply the resulting version changes.

use serde::Serialize;

use depfix_resolver::conflict::ConflictReport;
use depfix_resolver::resolver::{ResolutionPlan, Resolver};
use depfix_util::errors::DepfixError;
use depfix_util::progress;

use crate::context::Context;
use crate::ops_scan;

/// Options for `depfix fix`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixOptions {
    /// Apply without asking.
    pub yes: bool,
    /// Plan only; never call the installer.
    pub dry_run: bool,
}

/// Conflicts found by the scan and the plan derived from them.
pub struct FixPlan {
    pub report: ConflictReport,
    pub plan: ResolutionPlan,
}

/// Result of applying one resolution.
#[derive(Debug, Clone, Serialize)]
pub struct Applied {
    pub package: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Applied {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-package results of an apply pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub applied: Vec<Applied>,
    /// Packages never attempted because the run was interrupted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_attempted: Vec<String>,
    pub interrupted: bool,
}

impl ApplyReport {
    pub fn all_succeeded(&self) -> bool {
        !self.interrupted && self.applied.iter().all(Applied::succeeded)
    }

    /// The last package touched before an interrupt stopped the pass.
    pub fn in_flight(&self) -> Option<&Applied> {
        if self.interrupted {
            self.applied.last()
        } else {
            None
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &Applied> {
        self.applied.iter().filter(|a| !a.succeeded())
    }
}

/// Scan and, when conflicts exist, resolve them against the index.
pub fn plan(ctx: &Context) -> miette::Result<FixPlan> {
    let report = ops_scan::scan(ctx)?;
    if report.is_empty() {
        return Ok(FixPlan {
            report,
            plan: ResolutionPlan::default(),
        });
    }

    let sp = progress::spinner("Querying package index...");
    let plan = Resolver::new(ctx.index.as_ref()).resolve(&report.conflicts);
    sp.finish_and_clear();
    ctx.check_interrupted()?;

    Ok(FixPlan { report, plan })
}

/// Apply every resolution in order.
///
/// A failed package is recorded and the remaining ones are still attempted.
/// An interrupt stops the pass between packages; the package in flight
/// finishes (or fails) and the rest are listed as not attempted.
pub fn apply(ctx: &Context, plan: &ResolutionPlan) -> ApplyReport {
    if plan.is_empty() {
        tracing::info!("No fixes to apply");
        return ApplyReport::default();
    }
    tracing::info!("Applying {} fixes...", plan.resolutions.len());

    let mut report = ApplyReport::default();
    for (i, r) in plan.resolutions.iter().enumerate() {
        if ctx.is_interrupted() {
            report.interrupted = true;
            report.not_attempted = plan.resolutions[i..]
                .iter()
                .map(|r| r.package.clone())
                .collect();
            tracing::warn!(
                "Interrupted; {} packages not attempted",
                report.not_attempted.len()
            );
            break;
        }
        let result = ctx
            .installer
            .replace(&r.package, &r.current_version, &r.resolved_version);
        let error = match result {
            Ok(()) => {
                progress::status(
                    "Updated",
                    &format!("{} {} -> {}", r.package, r.current_version, r.resolved_version),
                );
                None
            }
            Err(e) => {
                tracing::error!("{e}");
                progress::status_error("Failed", &r.package);
                Some(e.to_string())
            }
        };
        report.applied.push(Applied {
            package: r.package.clone(),
            from: r.current_version.clone(),
            to: r.resolved_version.clone(),
            error,
        });
    }
    report
}

/// Ask whether to apply `count` updates.
///
/// Answers "no" without prompting when stderr is not a terminal.
pub fn confirm(count: usize) -> miette::Result<bool> {
    if !console::Term::stderr().is_term() {
        progress::status_warn("Skipping", "not a terminal; pass --yes to apply fixes");
        return Ok(false);
    }
    dialoguer::Confirm::new()
        .with_prompt(format!("Proceed with applying {count} fixes?"))
        .default(false)
        .interact()
        .map_err(|e| match e {
            dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                DepfixError::Interrupted.into()
            }
            other => DepfixError::Generic {
                message: format!("Failed to read confirmation: {other}"),
            }
            .into(),
        })
}
