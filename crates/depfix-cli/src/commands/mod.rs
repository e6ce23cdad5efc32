//! Command dispatch and handler modules.

mod fix;
mod graph;
mod lock;
mod outdated;
mod restore;
mod scan;

use miette::Result;
use serde::Serialize;

use depfix_core::config::Config;
use depfix_ops::context::Context;
use depfix_util::errors::DepfixError;

use crate::cli::{Cli, Command};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
/// Conflicts are present (and, for `fix`, could not be resolved).
pub const EXIT_CONFLICTS: u8 = 2;

/// Route a parsed CLI invocation to the appropriate command handler and
/// return the process exit status.
///
/// Any error raised after Ctrl-C is reported as [`DepfixError::Interrupted`],
/// since a killed child process surfaces as an ordinary tool failure.
pub fn dispatch(cli: Cli) -> Result<u8> {
    tracing::debug!(command = ?cli.command, "dispatching");
    let ctx = load_context(&cli)?;
    ctx.watch_interrupts()?;
    let json = cli.json;
    let outcome = match cli.command {
        Command::Scan => scan::exec(&ctx, json),
        Command::Fix { yes, dry_run } => fix::exec(&ctx, json, yes, dry_run),
        Command::Lock { output } => lock::exec(&ctx, json, output),
        Command::Restore { file } => restore::exec(&ctx, file),
        Command::Graph { format, with_index } => graph::exec(&ctx, format, with_index),
        Command::Outdated => outdated::exec(&ctx, json),
    };
    match outcome {
        Err(e) if ctx.is_interrupted() => {
            tracing::debug!("error after interrupt: {e}");
            Err(DepfixError::Interrupted.into())
        }
        other => other,
    }
}

/// Load configuration, apply flag overrides and wire the collaborators.
fn load_context(cli: &Cli) -> Result<Context> {
    let cwd = std::env::current_dir().map_err(DepfixError::Io)?;
    let mut config = Config::discover(cli.config.as_deref(), &cwd)?;
    if let Some(ref python) = cli.python {
        config.environment.python = python.clone();
    }
    if let Some(ref url) = cli.index_url {
        config.index.url = url.clone();
    }
    Context::from_config(config)
}

/// Print `value` to stdout as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| DepfixError::Generic {
        message: format!("Failed to serialize output: {e}"),
    })?;
    println!("{text}");
    Ok(())
}
