//! depfix CLI binary.
//!
//! This is the entry point for the `depfix` command-line tool. It initializes
//! logging via `tracing`, parses arguments with `clap`, dispatches to the
//! appropriate command handler, and maps the outcome to an exit status. Ctrl-C
//! is caught so that a partially applied fix can still be reported.

mod cli;
mod commands;

use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use depfix_util::errors::DepfixError;
use depfix_util::progress;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("{e:?}");
        return ExitCode::from(commands::EXIT_FAILURE);
    }

    match commands::dispatch(args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            if let Some(DepfixError::Interrupted) = e.downcast_ref::<DepfixError>() {
                progress::status_warn("Cancelled", "interrupted by user");
            } else {
                eprintln!("{e:?}");
            }
            ExitCode::from(commands::EXIT_FAILURE)
        }
    }
}

/// Install the global subscriber: stderr always, plus a plain-text file
/// layer when `--log-file` is given. `RUST_LOG` overrides the level flags.
fn init_logging(args: &cli::Cli) -> miette::Result<()> {
    let default_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match args.log_file.as_deref() {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn open_log_file(path: &Path) -> miette::Result<File> {
    File::create(path).map_err(|e| {
        DepfixError::Generic {
            message: format!("Failed to open log file {}: {e}", path.display()),
        }
        .into()
    })
}
