//! Per-dependency version resolution.
//!
//! Conflicts are grouped by the dependency they name. For each group the
//! union of required constraints is collected and the index's release list
//! is scanned newest first; the first release admitted by every constraint
//! wins. Groups are independent: a group that cannot be satisfied is
//! reported and the others still resolve. There is no joint search across
//! packages.

use std::fmt;

use serde::Serialize;

use depfix_index::client::PackageIndex;
use depfix_util::errors::DepfixError;

use crate::conflict::Conflict;
use crate::version::{self, Candidate, Constraint};

/// A chosen version for one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The conflicting dependency.
    pub package: String,
    pub current_version: String,
    pub resolved_version: String,
    pub conflicts: Vec<Conflict>,
}

/// A dependency for which no resolution was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unresolved {
    pub package: String,
    pub current_version: String,
    pub constraints: Vec<String>,
    pub reason: String,
}

/// Outcome of one resolve pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionPlan {
    pub resolutions: Vec<Resolution>,
    pub unresolved: Vec<Unresolved>,
}

impl ResolutionPlan {
    pub fn is_empty(&self) -> bool {
        self.resolutions.is_empty()
    }
}

impl fmt::Display for ResolutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.resolutions.is_empty() {
            writeln!(f, "No resolutions available.")?;
        } else {
            writeln!(
                f,
                "Resolution plan ({} packages to update):",
                self.resolutions.len()
            )?;
            for (i, r) in self.resolutions.iter().enumerate() {
                writeln!(f)?;
                writeln!(f, "{}. {}", i + 1, r.package)?;
                writeln!(f, "   Current: {}", r.current_version)?;
                writeln!(f, "   Target:  {}", r.resolved_version)?;
                writeln!(f, "   Conflicts: {}", r.conflicts.len())?;
            }
        }
        if !self.unresolved.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unresolved ({}):", self.unresolved.len())?;
            for u in &self.unresolved {
                writeln!(f, "  {}: {}", u.package, u.reason)?;
            }
        }
        Ok(())
    }
}

/// Group conflicts by conflicting dependency, keeping first-seen order for
/// groups and detection order within a group.
pub fn group_by_dependency(conflicts: &[Conflict]) -> Vec<(String, Vec<Conflict>)> {
    let mut groups: Vec<(String, Vec<Conflict>)> = Vec::new();
    for conflict in conflicts {
        match groups
            .iter_mut()
            .find(|(name, _)| *name == conflict.conflicting_dependency)
        {
            Some((_, group)) => group.push(conflict.clone()),
            None => groups.push((
                conflict.conflicting_dependency.clone(),
                vec![conflict.clone()],
            )),
        }
    }
    groups
}

/// Pick the first candidate admitted by every constraint.
///
/// `candidates` must be sorted newest first. Unparseable candidates are
/// never chosen. Pre-releases are only considered when a constraint is
/// itself written against a pre-release.
pub fn select_version<'c>(
    candidates: &'c [Candidate],
    constraints: &[Constraint],
) -> Option<&'c Candidate> {
    let allow_prerelease = constraints.iter().any(Constraint::mentions_prerelease);
    candidates.iter().find(|candidate| {
        let Some(ref version) = candidate.version else {
            return false;
        };
        if candidate.is_prerelease() && !allow_prerelease {
            return false;
        }
        constraints.iter().all(|c| c.admits(version))
    })
}

/// Resolves conflict groups against a package index.
pub struct Resolver<'a> {
    index: &'a dyn PackageIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a dyn PackageIndex) -> Self {
        Self { index }
    }

    /// Resolve every conflicting dependency independently.
    ///
    /// Fetches the release list once per distinct dependency name.
    pub fn resolve(&self, conflicts: &[Conflict]) -> ResolutionPlan {
        let groups = group_by_dependency(conflicts);
        tracing::info!("Resolving conflicts for {} packages...", groups.len());

        let mut plan = ResolutionPlan::default();
        for (name, group) in groups {
            let current_version = group[0].installed_version.clone();
            let required: Vec<String> = unique_constraints(&group);

            match self.resolve_group(&name, &required) {
                Ok(resolved_version) => {
                    tracing::info!("Resolved {name}: {current_version} -> {resolved_version}");
                    plan.resolutions.push(Resolution {
                        package: name,
                        current_version,
                        resolved_version,
                        conflicts: group,
                    });
                }
                Err(e) => {
                    tracing::error!("Cannot resolve conflicts for {name}: {e}");
                    plan.unresolved.push(Unresolved {
                        package: name,
                        current_version,
                        constraints: required,
                        reason: e.to_string(),
                    });
                }
            }
        }
        plan
    }

    fn resolve_group(&self, name: &str, required: &[String]) -> Result<String, DepfixError> {
        let mut constraints: Vec<Constraint> = Vec::with_capacity(required.len());
        for text in required {
            match Constraint::parse(text) {
                Ok(c) => constraints.push(c),
                Err(e) => {
                    // An unreadable constraint can admit nothing.
                    tracing::warn!(package = name, "{e}");
                    return Err(DepfixError::NoCompatibleVersion {
                        package: name.to_string(),
                        constraints: required.join(", "),
                    });
                }
            }
        }

        let available = self.index.available_versions(name)?;
        if available.is_empty() {
            tracing::warn!(package = name, "index lists no releases");
        }
        let candidates = version::sort_descending(name, &available);

        select_version(&candidates, &constraints)
            .map(|c| c.text.clone())
            .ok_or_else(|| DepfixError::NoCompatibleVersion {
                package: name.to_string(),
                constraints: required.join(", "),
            })
    }
}

fn unique_constraints(group: &[Conflict]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for conflict in group {
        if !out.contains(&conflict.required_constraint) {
            out.push(conflict.required_constraint.clone());
        }
    }
    out
}
