//! Package registry construction and traversal.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use depfix_core::tree::InstalledPackage;
use depfix_index::metadata::ProjectMetadata;

/// An installed package.
#[derive(Debug, Clone)]
pub struct PackageNode {
    /// Normalised name; unique within a registry.
    pub name: String,
    /// Installed version; empty when unknown.
    pub version: String,
    /// Index metadata, when it has been fetched during this run.
    pub metadata: Option<Rc<ProjectMetadata>>,
}

impl fmt::Display for PackageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Edge label: what the parent observed about one of its dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepEdge {
    /// Installed version of the dependency as seen from the parent.
    pub installed_version: String,
    /// Declared range specifier. Never empty or a wildcard.
    pub constraint: Option<String>,
}

/// Name-keyed registry of installed packages with forward and reverse
/// dependency edges, backed by petgraph.
///
/// Node and edge iteration follow insertion order, so everything derived
/// from a registry is deterministic for a given input tree.
#[derive(Debug, Default)]
pub struct PackageRegistry {
    graph: DiGraph<PackageNode, DepEdge>,
    index: HashMap<String, NodeIndex>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node or return the existing one. An empty stored version is
    /// filled in from `version`; a known version is never overwritten.
    pub fn ensure_node(&mut self, name: &str, version: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            let node = &mut self.graph[idx];
            if node.version.is_empty() && !version.is_empty() {
                node.version = version.to_string();
            }
            return idx;
        }
        let idx = self.graph.add_node(PackageNode {
            name: name.to_string(),
            version: version.to_string(),
            metadata: None,
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Record that `from` depends on `to`.
    ///
    /// A repeated edge takes the newer installed version and keeps the
    /// previous constraint unless a new one is given.
    pub fn add_dependency(&mut self, from: NodeIndex, to: NodeIndex, edge: DepEdge) {
        match self.graph.find_edge(from, to) {
            Some(existing) => {
                let current = &mut self.graph[existing];
                current.installed_version = edge.installed_version;
                if edge.constraint.is_some() {
                    current.constraint = edge.constraint;
                }
            }
            None => {
                self.graph.add_edge(from, to, edge);
            }
        }
    }

    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&PackageNode> {
        self.find(name).map(|idx| &self.graph[idx])
    }

    pub fn node(&self, idx: NodeIndex) -> &PackageNode {
        &self.graph[idx]
    }

    /// Node indices in insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &PackageNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Direct dependencies of a node, in the order they were declared.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<(&PackageNode, &DepEdge)> {
        let mut edges: Vec<(EdgeIndex, NodeIndex, &DepEdge)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.target(), e.weight()))
            .collect();
        edges.sort_by_key(|(id, _, _)| *id);
        edges
            .into_iter()
            .map(|(_, target, edge)| (&self.graph[target], edge))
            .collect()
    }

    /// Dependency name → installed version as observed by `name`.
    pub fn dependency_versions(&self, name: &str) -> BTreeMap<String, String> {
        let Some(idx) = self.find(name) else {
            return BTreeMap::new();
        };
        self.dependencies_of(idx)
            .into_iter()
            .map(|(dep, edge)| (dep.name.clone(), edge.installed_version.clone()))
            .collect()
    }

    /// Dependency name → declared constraint for `name`.
    pub fn constraints(&self, name: &str) -> BTreeMap<String, String> {
        let Some(idx) = self.find(name) else {
            return BTreeMap::new();
        };
        self.dependencies_of(idx)
            .into_iter()
            .filter_map(|(dep, edge)| {
                edge.constraint
                    .as_ref()
                    .map(|c| (dep.name.clone(), c.clone()))
            })
            .collect()
    }

    /// Names of packages that depend on `name`, sorted.
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        let Some(idx) = self.find(name) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| self.graph[e.source()].name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Cache index metadata on a node. Unknown names are ignored.
    pub fn attach_metadata(&mut self, name: &str, metadata: Rc<ProjectMetadata>) {
        if let Some(idx) = self.find(name) {
            self.graph[idx].metadata = Some(metadata);
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Build a registry from the normalised installed-package tree.
///
/// Walks depth-first from every top-level entry. Every referenced
/// dependency gets a node, and a dependency already on the current path is
/// linked but not descended into again, so cyclic trees terminate.
pub fn build(packages: &[InstalledPackage]) -> PackageRegistry {
    let mut registry = PackageRegistry::new();
    let mut path = HashSet::new();
    for package in packages {
        visit(&mut registry, package, &mut path);
    }
    tracing::debug!(
        nodes = registry.len(),
        edges = registry.edge_count(),
        "built package registry"
    );
    registry
}

fn visit<'a>(
    registry: &mut PackageRegistry,
    package: &'a InstalledPackage,
    path: &mut HashSet<&'a str>,
) {
    let parent = registry.ensure_node(&package.name, &package.version);
    if !path.insert(package.name.as_str()) {
        tracing::debug!(package = %package.name, "dependency cycle, not descending");
        return;
    }

    for dep in &package.dependencies {
        let child = registry.ensure_node(&dep.name, &dep.version);
        registry.add_dependency(
            parent,
            child,
            DepEdge {
                installed_version: dep.version.clone(),
                constraint: dep.required.clone(),
            },
        );
        visit(registry, dep, path);
    }

    path.remove(package.name.as_str());
}
