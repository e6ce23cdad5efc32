//! Requirement-text parsing for declared dependencies.
//!
//! Requirement lines are PEP 508 strings as found in index metadata and
//! consistency-check output, for example `urllib3 (<1.27,>=1.21.1)` or
//! `requests[socks] >=2.0 ; python_version >= "3.8"`. Direct URL references
//! (`name @ https://...`) carry no range specifier.

use std::collections::BTreeMap;

use pep508_rs::VersionOrUrl;

/// A parsed requirement line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Normalised distribution name.
    pub name: String,
    pub extras: Vec<String>,
    /// Comma-joined range specifier; empty when unconstrained.
    pub specifier: String,
    pub marker: Option<String>,
}

impl Requirement {
    /// Whether this requirement only applies when an optional extra is
    /// requested.
    pub fn is_extra_only(&self) -> bool {
        self.marker.as_deref().is_some_and(|m| {
            m.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .any(|tok| tok == "extra")
        })
    }
}

/// Parse a single requirement line. Returns `None` for anything that is not
/// a well-formed PEP 508 requirement.
pub fn parse(text: &str) -> Option<Requirement> {
    let req: pep508_rs::Requirement = match text.trim().parse() {
        Ok(req) => req,
        Err(e) => {
            tracing::debug!(requirement = text, "{e}");
            return None;
        }
    };

    let specifier = match req.version_or_url {
        Some(VersionOrUrl::VersionSpecifier(ref specifiers)) => specifiers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
        Some(VersionOrUrl::Url(_)) => {
            tracing::debug!(requirement = text, "ignoring direct URL reference");
            String::new()
        }
        None => String::new(),
    };

    Some(Requirement {
        name: req.name.to_string(),
        extras: req.extras.iter().map(ToString::to_string).collect(),
        specifier,
        marker: req.marker.try_to_string(),
    })
}

/// Collect name → specifier for every unconditional, constrained requirement.
pub fn declared_constraints(requires: &[String]) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for line in requires {
        let Some(req) = parse(line) else {
            tracing::debug!(requirement = %line, "failed to parse requirement");
            continue;
        };
        if req.is_extra_only() || req.specifier.is_empty() {
            continue;
        }
        out.insert(req.name, req.specifier);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenthesized_specifier() {
        let req = parse("urllib3 (<1.27,>=1.21.1)").unwrap();
        assert_eq!(req.name, "urllib3");
        assert_eq!(req.specifier, "<1.27,>=1.21.1");
        assert!(req.marker.is_none());
    }

    #[test]
    fn glued_specifier() {
        let req = parse("idna<4,>=2.5").unwrap();
        assert_eq!(req.name, "idna");
        assert_eq!(req.specifier, "<4,>=2.5");
    }

    #[test]
    fn extras_and_marker() {
        let req = parse("requests[socks, security] >= 2.0 ; python_version >= \"3.8\"").unwrap();
        assert_eq!(req.name, "requests");
        assert_eq!(req.extras, vec!["socks", "security"]);
        assert_eq!(req.specifier, ">=2.0");
        assert!(req.marker.as_deref().is_some_and(|m| m.contains("3.8")));
        assert!(!req.is_extra_only());
    }

    #[test]
    fn extra_marker_detected() {
        let req = parse("PySocks!=1.5.7,>=1.5.6; extra == \"socks\"").unwrap();
        assert_eq!(req.name, "pysocks");
        assert!(req.is_extra_only());
    }

    #[test]
    fn bare_name() {
        let req = parse("six").unwrap();
        assert_eq!(req.specifier, "");
    }

    #[test]
    fn url_reference() {
        let req = parse("pkg @ https://example.com/pkg.whl").unwrap();
        assert_eq!(req.specifier, "");
    }

    #[test]
    fn empty_is_none() {
        assert!(parse("").is_none());
        assert!(parse(">=1.0").is_none());
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(parse("foo >=1.0 junk").is_none());
        assert!(parse("bar (>=1.0").is_none());
        assert!(parse("baz[socks >=1").is_none());
    }

    #[test]
    fn declared_constraints_skip_malformed_lines() {
        let lines = vec![
            "foo >=1.0 junk".to_string(),
            "bar (>=1.0".to_string(),
            "idna<4,>=2.5".to_string(),
        ];
        let map = declared_constraints(&lines);
        assert_eq!(map.len(), 1);
        assert_eq!(map["idna"], "<4,>=2.5");
    }

    #[test]
    fn declared_constraints_normalizes_names() {
        let lines = vec![
            "Typing_Extensions>=4.0".to_string(),
            "six".to_string(),
            "mock; extra == 'test'".to_string(),
        ];
        let map = declared_constraints(&lines);
        assert_eq!(map.len(), 1);
        assert_eq!(map["typing-extensions"], ">=4.0");
    }
}
