use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all depfix operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DepfixError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The package index could not be reached or returned unusable data.
    #[error("Registry unavailable for {package}: {message}")]
    RegistryUnavailable { package: String, message: String },

    /// A range specifier could not be parsed.
    #[error("Invalid constraint '{constraint}': {message}")]
    InvalidConstraint { constraint: String, message: String },

    /// A version string could not be parsed.
    #[error("Invalid version '{version}': {message}")]
    InvalidVersion { version: String, message: String },

    /// The environment inspector failed or produced unparseable output.
    #[error("Environment inspection failed: {message}")]
    #[diagnostic(help("Make sure pipdeptree is installed in the target environment"))]
    InspectionFailure { message: String },

    /// No available release satisfies every collected constraint.
    #[error("No compatible version of {package} satisfies: {constraints}")]
    NoCompatibleVersion {
        package: String,
        constraints: String,
    },

    /// Installing or uninstalling a package failed.
    #[error("Failed to update {package}: {message}")]
    InstallerFailure { package: String, message: String },

    /// Lock file could not be read, parsed or written.
    #[error("Lock file error: {message}")]
    #[diagnostic(help("Lock files map package names to exact versions as a JSON object"))]
    LockFile { message: String },

    /// Invalid or malformed configuration file.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check your depfix.toml for syntax errors"))]
    Config { message: String },

    /// The user interrupted the run.
    #[error("Interrupted")]
    Interrupted,

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

