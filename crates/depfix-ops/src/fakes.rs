//! In-memory collaborators for operation tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use depfix_core::config::Config;
use depfix_core::tree::{self, InstalledPackage};
use depfix_index::client::PackageIndex;
use depfix_index::metadata::{self, ProjectMetadata};
use depfix_util::errors::DepfixError;

use crate::context::Context;
use crate::environment::{Environment, Installer};

#[derive(Default)]
pub struct FakeIndex {
    projects: HashMap<String, Rc<ProjectMetadata>>,
    offline: HashSet<String>,
    pub lookups: Rc<RefCell<Vec<String>>>,
}

impl FakeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_releases(mut self, name: &str, versions: &[&str]) -> Self {
        self.projects.insert(name.to_string(), project(name, versions, &[]));
        self
    }

    pub fn with_requires(mut self, name: &str, versions: &[&str], requires: &[&str]) -> Self {
        self.projects
            .insert(name.to_string(), project(name, versions, requires));
        self
    }

    pub fn with_offline(mut self, name: &str) -> Self {
        self.offline.insert(name.to_string());
        self
    }
}

/// Metadata whose `info.version` is the first entry of `versions`.
fn project(name: &str, versions: &[&str], requires: &[&str]) -> Rc<ProjectMetadata> {
    let releases: serde_json::Map<String, serde_json::Value> = versions
        .iter()
        .map(|v| {
            (
                v.to_string(),
                serde_json::json!([{ "filename": format!("{name}-{v}.tar.gz"), "yanked": false }]),
            )
        })
        .collect();
    let doc = serde_json::json!({
        "info": {
            "name": name,
            "version": versions.first().copied().unwrap_or("0"),
            "requires_dist": requires,
        },
        "releases": releases,
    });
    Rc::new(metadata::parse_project(&doc.to_string()).unwrap())
}

impl PackageIndex for FakeIndex {
    fn project(&self, name: &str) -> Result<Option<Rc<ProjectMetadata>>, DepfixError> {
        self.lookups.borrow_mut().push(name.to_string());
        if self.offline.contains(name) {
            return Err(DepfixError::RegistryUnavailable {
                package: name.to_string(),
                message: "offline".to_string(),
            });
        }
        Ok(self.projects.get(name).cloned())
    }
}

#[derive(Default)]
pub struct FakeEnvironment {
    pub tree: String,
    pub check: String,
    pub freeze: String,
    pub broken: bool,
}

impl FakeEnvironment {
    pub fn with_tree(tree: &str) -> Self {
        Self {
            tree: tree.to_string(),
            ..Self::default()
        }
    }
}

impl Environment for FakeEnvironment {
    fn inspect_tree(&self) -> Result<Vec<InstalledPackage>, DepfixError> {
        if self.broken {
            return Err(DepfixError::InspectionFailure {
                message: "No module named pipdeptree".to_string(),
            });
        }
        tree::parse_tree(&self.tree)
    }

    fn check_output(&self) -> Result<String, DepfixError> {
        Ok(self.check.clone())
    }

    fn freeze(&self) -> Result<String, DepfixError> {
        if self.broken {
            return Err(DepfixError::InspectionFailure {
                message: "pip unavailable".to_string(),
            });
        }
        Ok(self.freeze.clone())
    }
}

/// Records every call as a display string; fails for names in `failing`.
///
/// With `interrupt_on` set, raising the flag stands in for Ctrl-C arriving
/// while that package is being replaced.
#[derive(Default)]
pub struct FakeInstaller {
    pub calls: Rc<RefCell<Vec<String>>>,
    pub failing: HashSet<String>,
    pub interrupt_on: Option<(String, Arc<AtomicBool>)>,
}

impl Installer for FakeInstaller {
    fn replace(&self, name: &str, from: &str, to: &str) -> Result<(), DepfixError> {
        self.calls.borrow_mut().push(format!("{name} {from} -> {to}"));
        if let Some((ref target, ref flag)) = self.interrupt_on {
            if target == name {
                flag.store(true, Ordering::SeqCst);
            }
        }
        if self.failing.contains(name) {
            return Err(DepfixError::InstallerFailure {
                package: name.to_string(),
                message: "exit status 1".to_string(),
            });
        }
        Ok(())
    }

    fn install_pins(&self, pins: &[String]) -> Result<(), DepfixError> {
        self.calls.borrow_mut().push(format!("install {}", pins.join(" ")));
        Ok(())
    }
}

pub fn context(index: FakeIndex, env: FakeEnvironment, installer: FakeInstaller) -> Context {
    Context::with_collaborators(
        Config::default(),
        Box::new(index),
        Box::new(env),
        Box::new(installer),
    )
}

/// `app` needs `urllib3<1.27,>=1.21.1` but `urllib3 2.0.7` is installed;
/// `idna` is unconstrained.
pub const CONFLICTED_TREE: &str = r#"[
    {
        "key": "app",
        "package_name": "app",
        "installed_version": "1.0",
        "dependencies": [
            {
                "key": "urllib3",
                "package_name": "urllib3",
                "installed_version": "2.0.7",
                "required_version": "urllib3<1.27,>=1.21.1",
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
    }
]"#;

pub const CLEAN_TREE: &str = r#"[
    {
        "package": {"key": "app", "package_name": "app", "installed_version": "1.0"},
        "dependencies": [
            {
                "package": {"key": "idna", "package_name": "idna", "installed_version": "3.6"},
                "required_version": ">=3",
                "dependencies": []
            }
        ]
    }
]"#;
