//! Project metadata as served by the index JSON API (`/pypi/<name>/json`).

use std::collections::BTreeMap;

use serde::Deserialize;

use depfix_util::errors::DepfixError;

use crate::requirement;

/// Project-level metadata listing every release.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMetadata {
    pub info: ProjectInfo,
    #[serde(default)]
    pub releases: BTreeMap<String, Vec<ReleaseFile>>,
}

/// The `info` block, describing the latest release.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub requires_dist: Option<Vec<String>>,
    #[serde(default)]
    pub requires_python: Option<String>,
}

/// One distribution file of a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseFile {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub yanked: bool,
    #[serde(default)]
    pub requires_python: Option<String>,
}

impl ProjectMetadata {
    /// Version string of the latest release according to the index.
    pub fn latest(&self) -> &str {
        &self.info.version
    }

    /// Every release that can still be installed by a range specifier.
    ///
    /// Releases whose files are all yanked are left out; releases with no
    /// files at all are kept. Order is unspecified.
    pub fn release_versions(&self) -> Vec<String> {
        self.releases
            .iter()
            .filter(|(_, files)| files.is_empty() || files.iter().any(|f| !f.yanked))
            .map(|(version, _)| version.clone())
            .collect()
    }

    /// Constraints the latest release declares on its unconditional
    /// dependencies, keyed by normalised dependency name.
    pub fn declared_constraints(&self) -> BTreeMap<String, String> {
        requirement::declared_constraints(self.info.requires_dist.as_deref().unwrap_or_default())
    }
}

/// Parse a JSON API response body.
pub fn parse_project(json: &str) -> Result<ProjectMetadata, DepfixError> {
    serde_json::from_str(json).map_err(|e| DepfixError::Generic {
        message: format!("Failed to parse project metadata: {e}"),
    })
}
