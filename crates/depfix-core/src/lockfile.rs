use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use depfix_util::errors::DepfixError;

/// Default lock file name.
pub const DEFAULT_LOCKFILE: &str = "requirements.lock.json";

/// Exact-version pin list for reproducible reinstallation.
///
/// Serialised as a flat JSON object `{"name": "version"}`; keys are kept in
/// sorted order so the file is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lockfile {
    pub pins: BTreeMap<String, String>,
}

impl Lockfile {
    /// Build a lock file from `pip freeze` output.
    ///
    /// Only `name==version` lines are kept; comments, editable installs and
    /// direct references are ignored.
    pub fn from_freeze(output: &str) -> Self {
        let mut pins = BTreeMap::new();
        for line in output.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                continue;
            }
            if let Some((name, version)) = line.split_once("==") {
                let name = name.trim();
                let version = version.trim();
                if !name.is_empty() && !version.is_empty() {
                    pins.insert(name.to_string(), version.to_string());
                }
            } else {
                tracing::debug!(line, "skipping unpinned freeze entry");
            }
        }
        Self { pins }
    }

    /// Load and parse a lock file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DepfixError::LockFile {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        serde_json::from_str(&content).map_err(|e| {
            DepfixError::LockFile {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Serialize the lock file to pretty-printed JSON with sorted keys.
    pub fn to_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the lock file to disk.
    pub fn write_to(&self, path: &Path) -> miette::Result<()> {
        let mut content = self.to_string_pretty().map_err(|e| DepfixError::LockFile {
            message: format!("Failed to serialize lock file: {e}"),
        })?;
        content.push('\n');
        depfix_util::fs::write_file(path, &content).map_err(|e| {
            DepfixError::LockFile {
                message: format!("Failed to write {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Every entry as an exact `name==version` requirement.
    pub fn requirements(&self) -> Vec<String> {
        self.pins
            .iter()
            .map(|(name, version)| format!("{name}=={version}"))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}
