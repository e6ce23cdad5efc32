//! The target Python environment: inspection and package installation.

use depfix_core::tree::{self, InstalledPackage};
use depfix_util::errors::DepfixError;
use depfix_util::process::CommandBuilder;

/// Read-only view of the installed environment.
pub trait Environment {
    /// The installed-package tree, normalised.
    fn inspect_tree(&self) -> Result<Vec<InstalledPackage>, DepfixError>;

    /// Raw report of the installer's own consistency check.
    fn check_output(&self) -> Result<String, DepfixError>;

    /// `name==version` listing of every installed distribution.
    fn freeze(&self) -> Result<String, DepfixError>;
}

/// Mutating operations on the environment.
pub trait Installer {
    /// Replace the installed `name` (at `from`) with exactly `to`.
    fn replace(&self, name: &str, from: &str, to: &str) -> Result<(), DepfixError>;

    /// Install every exact-version requirement in a single call.
    fn install_pins(&self, pins: &[String]) -> Result<(), DepfixError>;
}

/// Environment driven through `<python> -m pip` and `<python> -m pipdeptree`.
#[derive(Debug, Clone)]
pub struct PipEnvironment {
    python: String,
}

impl PipEnvironment {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    fn module(&self, module: &str) -> CommandBuilder {
        CommandBuilder::new(&self.python).args(["-m", module])
    }

    fn pip(&self) -> CommandBuilder {
        self.module("pip")
    }
}

impl Environment for PipEnvironment {
    fn inspect_tree(&self) -> Result<Vec<InstalledPackage>, DepfixError> {
        let stdout = self
            .module("pipdeptree")
            .arg("--json-tree")
            .exec_checked()
            .map_err(|e| DepfixError::InspectionFailure {
                message: e.to_string(),
            })?;
        let packages = tree::parse_tree(&stdout)?;
        tracing::info!("Found {} top-level packages", packages.len());
        Ok(packages)
    }

    fn check_output(&self) -> Result<String, DepfixError> {
        // `pip check` exits non-zero exactly when it has something to report.
        let output = self
            .pip()
            .arg("check")
            .exec()
            .map_err(|e| DepfixError::InspectionFailure {
                message: format!("failed to run pip check: {e}"),
            })?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn freeze(&self) -> Result<String, DepfixError> {
        self.pip()
            .arg("freeze")
            .exec_checked()
            .map_err(|e| DepfixError::InspectionFailure {
                message: e.to_string(),
            })
    }
}

impl Installer for PipEnvironment {
    fn replace(&self, name: &str, from: &str, to: &str) -> Result<(), DepfixError> {
        let failed = |e: DepfixError| DepfixError::InstallerFailure {
            package: name.to_string(),
            message: e.to_string(),
        };

        tracing::info!("Uninstalling {name}-{from}...");
        self.pip()
            .args(["uninstall", "-y", name])
            .exec_checked()
            .map_err(failed)?;

        tracing::info!("Installing {name}-{to}...");
        self.pip()
            .arg("install")
            .arg(format!("{name}=={to}"))
            .exec_checked()
            .map_err(failed)?;

        tracing::info!("Successfully updated {name} to {to}");
        Ok(())
    }

    fn install_pins(&self, pins: &[String]) -> Result<(), DepfixError> {
        self.pip()
            .arg("install")
            .args(pins.iter().cloned())
            .exec_checked()
            .map(|_| ())
            .map_err(|e| DepfixError::InstallerFailure {
                package: format!("{} pinned packages", pins.len()),
                message: e.to_string(),
            })
    }
}
