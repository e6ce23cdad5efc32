//! Version parsing, ordering, and range-specifier matching.
//!
//! Versions follow PEP 440 ordering (`1.0a1 < 1.0rc1 < 1.0 < 1.0.post1`),
//! never lexical string order. Range specifiers are comma-separated clauses
//! using `==`, `!=`, `<`, `<=`, `>`, `>=`, `~=` (compatible release) and
//! `===`; a version is admitted only when every clause admits it.

use std::fmt;
use std::str::FromStr;

use pep440_rs::{Version, VersionSpecifiers};

use depfix_util::errors::DepfixError;

/// Parse a version string.
pub fn parse_version(text: &str) -> Result<Version, DepfixError> {
    Version::from_str(text.trim()).map_err(|e| DepfixError::InvalidVersion {
        version: text.to_string(),
        message: e.to_string(),
    })
}

/// A parsed range specifier, keeping its original text for reporting.
#[derive(Debug, Clone)]
pub struct Constraint {
    text: String,
    specifiers: VersionSpecifiers,
}

impl Constraint {
    pub fn parse(text: &str) -> Result<Self, DepfixError> {
        let specifiers =
            VersionSpecifiers::from_str(text.trim()).map_err(|e| DepfixError::InvalidConstraint {
                constraint: text.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            text: text.trim().to_string(),
            specifiers,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Check if a version satisfies every clause.
    pub fn admits(&self, version: &Version) -> bool {
        self.specifiers.contains(version)
    }

    /// Whether any clause is written against a pre-release, which opts the
    /// constraint into matching pre-release candidates.
    pub fn mentions_prerelease(&self) -> bool {
        self.specifiers
            .iter()
            .any(|spec| spec.version().any_prerelease())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A release version offered by the index.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub text: String,
    /// `None` when the text is not a valid version.
    pub version: Option<Version>,
}

impl Candidate {
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            version: Version::from_str(text.trim()).ok(),
        }
    }

    pub fn is_prerelease(&self) -> bool {
        self.version.as_ref().is_some_and(Version::any_prerelease)
    }
}

/// Sort release versions newest first.
///
/// Entries that do not parse are kept, in their original relative order,
/// after every valid version; they are reported once with a warning.
pub fn sort_descending(package: &str, versions: &[String]) -> Vec<Candidate> {
    let (mut valid, invalid): (Vec<Candidate>, Vec<Candidate>) = versions
        .iter()
        .map(|v| Candidate::parse(v))
        .partition(|c| c.version.is_some());

    valid.sort_by(|a, b| b.version.cmp(&a.version));

    if !invalid.is_empty() {
        let names: Vec<&str> = invalid.iter().map(|c| c.text.as_str()).collect();
        tracing::warn!(
            package,
            count = invalid.len(),
            versions = %names.join(", "),
            "ignoring unparseable release versions for ordering"
        );
    }

    valid.extend(invalid);
    valid
}

/// The newest final (non pre-release) version in `versions`.
pub fn newest_release(versions: &[String]) -> Option<Version> {
    versions
        .iter()
        .filter_map(|v| Version::from_str(v.trim()).ok())
        .filter(|v| !v.any_prerelease())
        .max()
}
