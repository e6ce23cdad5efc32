//! CLI argument definitions for depfix.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "depfix",
    version,
    about = "Detect and automatically resolve dependency conflicts in Python environments",
    long_about = "depfix inspects the packages installed in a Python environment, reports \
                  every declared version constraint the installed versions violate, and \
                  proposes (or applies) the newest versions that satisfy them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a depfix.toml (default: search the current directory and its parents)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write logs to FILE
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Python interpreter of the target environment
    #[arg(long, global = true, env = "DEPFIX_PYTHON")]
    pub python: Option<String>,

    /// Base URL of the package index
    #[arg(long, global = true, env = "DEPFIX_INDEX_URL")]
    pub index_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan for dependency conflicts
    Scan,

    /// Resolve detected conflicts and update the affected packages
    Fix {
        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Show the plan without changing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Pin the current environment to a lock file
    Lock {
        /// Lock file to write (default: requirements.lock.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Reinstall the exact versions recorded in a lock file
    Restore {
        /// Lock file to read (default: requirements.lock.json)
        file: Option<PathBuf>,
    },

    /// Print the installed dependency graph
    Graph {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = GraphFormatArg::Json)]
        format: GraphFormatArg,
        /// Attach package index metadata to each node (JSON only)
        #[arg(long)]
        with_index: bool,
    },

    /// List installed packages with newer releases on the index
    Outdated,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphFormatArg {
    Json,
    Dot,
}

pub fn parse() -> Cli {
    Cli::parse()
}
