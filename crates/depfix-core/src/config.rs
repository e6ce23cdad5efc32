use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use depfix_util::errors::DepfixError;

use crate::lockfile::DEFAULT_LOCKFILE;

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = "depfix.toml";

/// Configuration loaded from `depfix.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub environment: EnvironmentConfig,

    #[serde(default)]
    pub lock: LockConfig,
}

/// Package index settings from `[index]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_url")]
    pub url: String,
    #[serde(default = "default_timeout", rename = "timeout-secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent", rename = "user-agent")]
    pub user_agent: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_index_url() -> String {
    "https://pypi.org".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("depfix/{}", env!("CARGO_PKG_VERSION"))
}

/// Target environment settings from `[environment]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Interpreter used to run pip and pipdeptree.
    #[serde(default = "default_python")]
    pub python: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
        }
    }
}

fn default_python() -> String {
    "python3".to_string()
}

/// Lock file settings from `[lock]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    #[serde(default = "default_lock_path")]
    pub path: PathBuf,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            path: default_lock_path(),
        }
    }
}

fn default_lock_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOCKFILE)
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, DepfixError> {
        toml::from_str(content).map_err(|e| DepfixError::Config {
            message: e.to_string(),
        })
    }

    /// Load configuration from an explicit path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DepfixError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Ok(Self::parse(&content)?)
    }

    /// Load `explicit` when given; otherwise look for `depfix.toml` in `cwd`
    /// and its ancestors, falling back to defaults when none exists.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> miette::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match depfix_util::fs::find_in_ancestors(cwd, CONFIG_FILE) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }
}
