//! Operation: scan the environment for dependency conflicts.

use depfix_resolver::conflict::{self, ConflictReport};
use depfix_resolver::graph::{self, PackageRegistry};

use crate::context::Context;

/// Inspect the environment and build a fresh registry from it.
pub fn load_registry(ctx: &Context) -> miette::Result<PackageRegistry> {
    let packages = ctx.environment.inspect_tree()?;
    Ok(graph::build(&packages))
}

/// Detect conflicts in the current environment.
///
/// When the registry shows no violations, the installer's consistency check
/// is consulted as a cross-check. A failing consistency check is logged and
/// does not fail the scan.
pub fn scan(ctx: &Context) -> miette::Result<ConflictReport> {
    let registry = load_registry(ctx)?;
    tracing::info!(
        "Checking {} packages for dependency conflicts",
        registry.len()
    );
    let report = conflict::detect(&registry);
    if !report.is_empty() {
        return Ok(report);
    }

    tracing::debug!("no conflicts in registry, running consistency check");
    match ctx.environment.check_output() {
        Ok(output) => {
            let fallback = conflict::parse_check_output(&output);
            if fallback.is_empty() {
                Ok(report)
            } else {
                tracing::info!(
                    "Consistency check reported {} conflicts",
                    fallback.len()
                );
                Ok(fallback)
            }
        }
        Err(e) => {
            tracing::warn!("consistency check unavailable: {e}");
            Ok(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use depfix_resolver::conflict::ConflictSource;
    use depfix_util::errors::DepfixError;

    use super::*;
    use crate::fakes::{self, FakeEnvironment, FakeIndex, FakeInstaller};

    #[test]
    fn registry_conflicts_win() {
        let env = FakeEnvironment {
            check: "x 1.0 requires y>=2, but you have y 1.0.".to_string(),
            ..FakeEnvironment::with_tree(fakes::CONFLICTED_TREE)
        };
        let ctx = fakes::context(FakeIndex::new(), env, FakeInstaller::default());
        let report = scan(&ctx).unwrap();
        assert_eq!(report.source, ConflictSource::Registry);
        assert_eq!(report.len(), 1);
        assert_eq!(report.conflicts[0].conflicting_dependency, "urllib3");
        assert_eq!(report.conflicts[0].required_constraint, "<1.27,>=1.21.1");
    }

    #[test]
    fn falls_back_to_consistency_check() {
        let env = FakeEnvironment {
            check: "requests 2.26.0 requires urllib3<1.27,>=1.21.1, but you have urllib3 2.2.0.\n"
                .to_string(),
            ..FakeEnvironment::with_tree(fakes::CLEAN_TREE)
        };
        let ctx = fakes::context(FakeIndex::new(), env, FakeInstaller::default());
        let report = scan(&ctx).unwrap();
        assert_eq!(report.source, ConflictSource::ConsistencyCheck);
        assert_eq!(report.conflicts[0].package, "requests");
    }

    #[test]
    fn clean_environment() {
        let env = FakeEnvironment {
            check: "No broken requirements found.\n".to_string(),
            ..FakeEnvironment::with_tree(fakes::CLEAN_TREE)
        };
        let ctx = fakes::context(FakeIndex::new(), env, FakeInstaller::default());
        let report = scan(&ctx).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.source, ConflictSource::Registry);
    }

    #[test]
    fn inspection_failure_is_fatal() {
        let env = FakeEnvironment {
            broken: true,
            ..FakeEnvironment::default()
        };
        let ctx = fakes::context(FakeIndex::new(), env, FakeInstaller::default());
        let err = scan(&ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DepfixError>(),
            Some(DepfixError::InspectionFailure { .. })
        ));
    }
}
