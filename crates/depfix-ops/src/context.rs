//! Explicit per-invocation context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use depfix_core::config::Config;
use depfix_index::cache::CachedIndex;
use depfix_index::client::{JsonApiClient, PackageIndex};
use depfix_util::errors::DepfixError;

use crate::environment::{Environment, Installer, PipEnvironment};

/// Configuration plus the collaborators every operation talks to.
///
/// Built once per invocation; the index handle caches metadata for the
/// lifetime of the context only.
pub struct Context {
    pub config: Config,
    pub index: Box<dyn PackageIndex>,
    pub environment: Box<dyn Environment>,
    pub installer: Box<dyn Installer>,
    /// Set once the user asks to stop. Long operations poll it between steps.
    pub interrupted: Arc<AtomicBool>,
}

impl Context {
    /// Wire the real collaborators from configuration.
    pub fn from_config(config: Config) -> miette::Result<Self> {
        let client = JsonApiClient::new(&config.index)?;
        let pip = PipEnvironment::new(config.environment.python.clone());
        tracing::debug!(
            index = %config.index.url,
            python = %config.environment.python,
            "context ready"
        );
        Ok(Self {
            index: Box::new(CachedIndex::new(client)),
            environment: Box::new(pip.clone()),
            installer: Box::new(pip),
            interrupted: Arc::new(AtomicBool::new(false)),
            config,
        })
    }

    /// Assemble a context from explicit collaborators.
    pub fn with_collaborators(
        config: Config,
        index: Box<dyn PackageIndex>,
        environment: Box<dyn Environment>,
        installer: Box<dyn Installer>,
    ) -> Self {
        Self {
            config,
            index,
            environment,
            installer,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Route Ctrl-C to the interrupt flag instead of terminating the process.
    ///
    /// Can only be installed once per process.
    pub fn watch_interrupts(&self) -> miette::Result<()> {
        let flag = Arc::clone(&self.interrupted);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)).map_err(|e| {
            DepfixError::Generic {
                message: format!("Failed to install interrupt handler: {e}"),
            }
        })?;
        Ok(())
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Fail with [`DepfixError::Interrupted`] once the flag is set.
    pub fn check_interrupted(&self) -> Result<(), DepfixError> {
        if self.is_interrupted() {
            Err(DepfixError::Interrupted)
        } else {
            Ok(())
        }
    }
}
