//! Graph export.
//!
//! Two pure views of a [`PackageRegistry`]: a structured name-keyed map
//! suitable for JSON, and a DOT edge list.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use depfix_util::errors::DepfixError;

use crate::graph::PackageRegistry;

/// Structured view of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeExport {
    pub version: String,
    /// Dependency name → installed version.
    pub dependencies: BTreeMap<String, String>,
    /// Dependency name → declared range specifier.
    pub constraints: BTreeMap<String, String>,
    /// Sorted names of packages depending on this one.
    pub dependents: Vec<String>,
    /// Index metadata, present only when it was attached before export.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexInfo>,
}

/// Index metadata summary for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    /// Latest release on the index.
    pub latest: String,
    /// Unconditional constraints declared by the latest release.
    pub requires: BTreeMap<String, String>,
}

/// Name-keyed structured export of every node.
pub fn to_structured(registry: &PackageRegistry) -> BTreeMap<String, NodeExport> {
    registry
        .nodes()
        .map(|node| {
            let export = NodeExport {
                version: node.version.clone(),
                dependencies: registry.dependency_versions(&node.name),
                constraints: registry.constraints(&node.name),
                dependents: registry
                    .dependents(&node.name)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                index: node.metadata.as_ref().map(|meta| IndexInfo {
                    latest: meta.latest().to_string(),
                    requires: meta.declared_constraints(),
                }),
            };
            (node.name.clone(), export)
        })
        .collect()
}

/// Pretty JSON rendering of [`to_structured`].
pub fn to_json(registry: &PackageRegistry) -> Result<String, DepfixError> {
    serde_json::to_string_pretty(&to_structured(registry)).map_err(|e| DepfixError::Generic {
        message: format!("Failed to serialize graph: {e}"),
    })
}

/// DOT edge list with one line per (package, dependency) pair.
///
/// Packages appear in registry order and dependencies in declaration order.
pub fn to_edge_list(registry: &PackageRegistry) -> String {
    let mut out = String::from("digraph deps {\n");
    for idx in registry.node_indices() {
        let parent = registry.node(idx);
        for (dep, _) in registry.dependencies_of(idx) {
            let _ = writeln!(out, "  \"{}\" -> \"{}\";", parent.name, dep.name);
        }
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use depfix_core::tree::{self, InstalledPackage};
    use depfix_index::metadata;

    use super::*;
    use crate::graph::build;

    const TREE: &str = r#"[
        {
            "key": "requests",
            "package_name": "requests",
            "installed_version": "2.31.0",
            "dependencies": [
                {
                    "key": "urllib3",
                    "package_name": "urllib3",
                    "installed_version": "2.0.7",
                    "required_version": "<1.27,>=1.21.1",
                    "dependencies": []
                },
                {
                    "key": "idna",
                    "package_name": "idna",
                    "installed_version": "3.6",
                    "required_version": "Any",
                    "dependencies": []
                }
            ]
        },
        {
            "key": "botocore",
            "package_name": "botocore",
            "installed_version": "1.31.0",
            "dependencies": [
                {
                    "key": "urllib3",
                    "package_name": "urllib3",
                    "installed_version": "2.0.7",
                    "required_version": ">=1.25.4,<1.27",
                    "dependencies": []
                }
            ]
        }
    ]"#;

    fn raw_edges(
        packages: &[InstalledPackage],
        out: &mut BTreeMap<(String, String), Option<String>>,
    ) {
        for p in packages {
            for d in &p.dependencies {
                out.insert((p.name.clone(), d.name.clone()), d.required.clone());
            }
            raw_edges(&p.dependencies, out);
        }
    }

    #[test]
    fn structured_matches_tree_edges() {
        let packages = tree::parse_tree(TREE).unwrap();
        let exported = to_structured(&build(&packages));

        let mut expected = BTreeMap::new();
        raw_edges(&packages, &mut expected);

        let mut seen = BTreeMap::new();
        for (name, node) in &exported {
            for dep in node.dependencies.keys() {
                seen.insert(
                    (name.clone(), dep.clone()),
                    node.constraints.get(dep).cloned(),
                );
            }
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn structured_fields() {
        let packages = tree::parse_tree(TREE).unwrap();
        let exported = to_structured(&build(&packages));

        assert_eq!(exported.len(), 4);
        let requests = &exported["requests"];
        assert_eq!(requests.version, "2.31.0");
        assert_eq!(requests.dependencies["idna"], "3.6");
        assert!(!requests.constraints.contains_key("idna"));
        assert_eq!(exported["urllib3"].dependents, vec!["botocore", "requests"]);
        assert!(exported["urllib3"].index.is_none());
    }

    #[test]
    fn edge_list_format() {
        let packages = tree::parse_tree(TREE).unwrap();
        let dot = to_edge_list(&build(&packages));
        assert_eq!(
            dot,
            "digraph deps {\n  \"requests\" -> \"urllib3\";\n  \"requests\" -> \"idna\";\n  \"botocore\" -> \"urllib3\";\n}\n"
        );
    }

    #[test]
    fn empty_registry() {
        let registry = PackageRegistry::new();
        assert_eq!(to_edge_list(&registry), "digraph deps {\n}\n");
        assert_eq!(to_json(&registry).unwrap(), "{}");
    }

    #[test]
    fn attached_metadata_is_exported() {
        let packages = tree::parse_tree(TREE).unwrap();
        let mut registry = build(&packages);
        let meta = metadata::parse_project(
            r#"{"info": {"name": "idna", "version": "3.7", "requires_dist": ["six>=1.0"]}}"#,
        )
        .unwrap();
        registry.attach_metadata("idna", Rc::new(meta));

        let json: serde_json::Value = serde_json::from_str(&to_json(&registry).unwrap()).unwrap();
        assert_eq!(json["idna"]["index"]["latest"], "3.7");
        assert_eq!(json["idna"]["index"]["requires"]["six"], ">=1.0");
        assert!(json["requests"].get("index").is_none());
    }
}
