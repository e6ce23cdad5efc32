//! Installed-package tree as reported by the environment inspector.
//!
//! The inspector (`pipdeptree --json-tree`) has emitted two shapes over time:
//!
//! ```json
//! {"key": "requests", "installed_version": "2.31.0", "dependencies": [...]}
//! {"package": {"key": "requests", "installed_version": "2.31.0"}, "dependencies": [...]}
//! ```
//!
//! Both are accepted by [`RawEntry`] and normalised into [`InstalledPackage`]
//! before anything else sees them.

use serde::Deserialize;

use depfix_util::errors::DepfixError;

use crate::name;

/// Constraint text meaning "no constraint".
pub const WILDCARD: &str = "Any";

/// One entry of the inspector output, in either historical shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub package: Option<Box<RawEntry>>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub installed_version: Option<String>,
    #[serde(default)]
    pub required_version: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<RawEntry>,
}

/// A normalised node of the installed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    /// Normalised package name.
    pub name: String,
    /// Installed version, empty when the inspector did not report one.
    pub version: String,
    /// Range specifier the parent declares for this package, if any.
    pub required: Option<String>,
    pub dependencies: Vec<InstalledPackage>,
}

impl RawEntry {
    /// The record carrying identity fields: the nested `package` object when
    /// present, the entry itself otherwise.
    fn info(&self) -> &RawEntry {
        self.package.as_deref().unwrap_or(self)
    }

    fn name(&self) -> Option<&str> {
        let info = self.info();
        info.key
            .as_deref()
            .or(info.package_name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Required-version text: the explicit `required_version` field first,
    /// then the generic `version` field, looked up on the entry and then on
    /// the nested package record.
    fn required_text(&self) -> Option<&str> {
        let nested = self.package.as_deref();
        self.required_version
            .as_deref()
            .or(self.version.as_deref())
            .or(nested.and_then(|p| p.required_version.as_deref()))
            .or(nested.and_then(|p| p.version.as_deref()))
    }

    /// Normalise into an [`InstalledPackage`].
    ///
    /// Returns `None` for entries without a usable name; their subtrees are
    /// dropped with them.
    pub fn normalize(&self) -> Option<InstalledPackage> {
        let raw_name = self.name()?;
        let name = name::normalize(raw_name);
        let version = self
            .info()
            .installed_version
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();
        let required = self
            .required_text()
            .and_then(|text| clean_constraint(raw_name, text));
        let dependencies = self
            .dependencies
            .iter()
            .filter_map(RawEntry::normalize)
            .collect();
        Some(InstalledPackage {
            name,
            version,
            required,
            dependencies,
        })
    }
}

/// Reduce declared constraint text to a bare range specifier.
///
/// Returns `None` for empty or wildcard text. A dependency name glued to the
/// front of the specifier (`urllib3<1.27,>=1.21.1`) is stripped.
pub fn clean_constraint(dep_name: &str, text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || is_wildcard(text) {
        return None;
    }
    let stripped = strip_name_prefix(dep_name, text).trim();
    if stripped.is_empty() || is_wildcard(stripped) {
        return None;
    }
    Some(stripped.to_string())
}

fn is_wildcard(text: &str) -> bool {
    text.eq_ignore_ascii_case(WILDCARD) || text == "*"
}

/// Strip a leading `dep_name` token from `text` when it is directly followed
/// by a specifier operator or whitespace.
///
/// The comparison is done on normalised names, so `typing_extensions>=4`
/// strips against `typing-extensions`.
pub fn strip_name_prefix<'a>(dep_name: &str, text: &'a str) -> &'a str {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(text.len());
    if end == 0 {
        return text;
    }
    let (head, rest) = text.split_at(end);
    // A bare version such as `1.0` is not a name.
    if head.starts_with(|c: char| c.is_ascii_digit()) {
        return text;
    }
    if name::normalize(head) == name::normalize(dep_name) {
        rest.trim_start()
    } else {
        text
    }
}

/// Parse inspector JSON output into normalised top-level packages.
pub fn parse_tree(json: &str) -> Result<Vec<InstalledPackage>, DepfixError> {
    if json.trim().is_empty() {
        tracing::warn!("inspector returned no packages");
        return Ok(Vec::new());
    }
    let raw: Vec<RawEntry> =
        serde_json::from_str(json).map_err(|e| DepfixError::InspectionFailure {
            message: format!("invalid JSON from inspector: {e}"),
        })?;
    tracing::debug!(count = raw.len(), "parsed top-level packages");
    Ok(raw.iter().filter_map(RawEntry::normalize).collect())
}
