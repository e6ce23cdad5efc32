//! Constraint violation detection.
//!
//! The primary detector walks every declared edge of a
//! [`PackageRegistry`]. The secondary path parses the textual report of the
//! installer's own consistency check (`pip check`) and is only consulted
//! when the primary detector finds nothing.

use std::fmt;

use serde::Serialize;

use depfix_core::name;
use depfix_index::requirement;

use crate::graph::PackageRegistry;
use crate::version::{parse_version, Constraint};

/// Kind of violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    VersionMismatch,
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictType::VersionMismatch => f.write_str("version_mismatch"),
        }
    }
}

/// A declared constraint violated by the installed version of the
/// constrained dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub package: String,
    pub package_version: String,
    pub conflicting_dependency: String,
    pub installed_version: String,
    pub required_constraint: String,
    pub conflict_type: ConflictType,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} requires {}{}, but {} is installed",
            self.package,
            self.package_version,
            self.conflicting_dependency,
            self.required_constraint,
            self.installed_version
        )
    }
}

/// Where a set of conflicts came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSource {
    /// Declared edges of the package registry.
    Registry,
    /// The installer's consistency-check report.
    ConsistencyCheck,
}

/// All conflicts found in one scan, in detection order.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictReport {
    pub source: ConflictSource,
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn new(source: ConflictSource) -> Self {
        Self {
            source,
            conflicts: Vec::new(),
        }
    }

    pub fn add(&mut self, conflict: Conflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No dependency conflicts found.");
        }
        writeln!(f, "Found {} dependency conflicts:", self.conflicts.len())?;
        for (i, c) in self.conflicts.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "{}. Package: {} (v{})", i + 1, c.package, c.package_version)?;
            writeln!(f, "   Dependency: {}", c.conflicting_dependency)?;
            writeln!(f, "   Installed: {}", c.installed_version)?;
            writeln!(f, "   Required: {}", c.required_constraint)?;
            writeln!(f, "   Type: {}", c.conflict_type)?;
        }
        Ok(())
    }
}

/// Report every declared constraint that the dependency's installed version
/// does not satisfy.
///
/// Nodes are visited in registry order and constraints in declaration
/// order, so repeated calls on the same registry give identical reports.
/// Malformed constraints and unparseable installed versions are logged and
/// skipped.
///
/// Installed versions are checked as-is. An installed pre-release is a
/// conflict only when it falls outside the range, never merely for being a
/// pre-release. Candidate selection in the resolver applies the stricter
/// opt-in rule.
pub fn detect(registry: &PackageRegistry) -> ConflictReport {
    let mut report = ConflictReport::new(ConflictSource::Registry);

    for parent_idx in registry.node_indices() {
        let parent = registry.node(parent_idx);
        for (dep, edge) in registry.dependencies_of(parent_idx) {
            let Some(ref text) = edge.constraint else {
                continue;
            };
            let constraint = match Constraint::parse(text) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(package = %parent.name, dependency = %dep.name, "{e}");
                    continue;
                }
            };
            let installed = match parse_version(&dep.version) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(dependency = %dep.name, "skipping constraint check: {e}");
                    continue;
                }
            };
            if !constraint.admits(&installed) {
                tracing::debug!(
                    package = %parent.name,
                    dependency = %dep.name,
                    required = %constraint,
                    installed = %dep.version,
                    "constraint violated"
                );
                report.add(Conflict {
                    package: parent.name.clone(),
                    package_version: parent.version.clone(),
                    conflicting_dependency: dep.name.clone(),
                    installed_version: dep.version.clone(),
                    required_constraint: constraint.as_str().to_string(),
                    conflict_type: ConflictType::VersionMismatch,
                });
            }
        }
    }

    report
}

/// Parse the report of the installer's consistency check.
///
/// Recognises lines of the form
/// `<pkg> <ver> requires <dep><spec>, but you have <dep> <installed>.`
/// (and the older `has requirement` wording). Anything else, including
/// missing-dependency lines, is ignored. Best effort: output formats vary
/// between tool versions.
pub fn parse_check_output(output: &str) -> ConflictReport {
    let mut report = ConflictReport::new(ConflictSource::ConsistencyCheck);
    for line in output.lines() {
        match parse_check_line(line.trim()) {
            Some(conflict) => report.add(conflict),
            None if !line.trim().is_empty() => {
                tracing::trace!(line, "unrecognised consistency-check line");
            }
            None => {}
        }
    }
    report
}

fn parse_check_line(line: &str) -> Option<Conflict> {
    let (left, right) = line.split_once(", but you have ")?;
    let (pkg_part, req_part) = left
        .split_once(" requires ")
        .or_else(|| left.split_once(" has requirement "))?;
    let (pkg_name, pkg_version) = pkg_part.trim().split_once(' ')?;

    let have = right.trim().trim_end_matches('.');
    let (dep_name, installed_version) = have.split_once(' ')?;

    let req = requirement::parse(req_part)?;
    if req.specifier.is_empty() {
        return None;
    }

    Some(Conflict {
        package: name::normalize(pkg_name),
        package_version: pkg_version.trim().to_string(),
        conflicting_dependency: name::normalize(dep_name),
        installed_version: installed_version.trim().to_string(),
        required_constraint: req.specifier,
        conflict_type: ConflictType::VersionMismatch,
    })
}
