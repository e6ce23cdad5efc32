//! Status lines and spinners on stderr.
//!
//! stdout carries reports and JSON; everything a person watches while a
//! scan or fix runs goes to stderr.

use std::fmt::Display;
use std::io::Write;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Width of the right-aligned label column.
const LABEL_WIDTH: usize = 12;

fn line(label: impl Display, message: &str) -> String {
    format!("{label:>LABEL_WIDTH$} {message}")
}

fn emit(style: Style, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{}", line(style.apply_to(label), message));
}

/// A completed step, green: `     Updated urllib3 2.0.7 -> 1.26.18`.
pub fn status(label: &str, message: &str) {
    emit(Style::new().green().bold(), label, message);
}

/// A step starting or a mode notice (`Fixing`, `Dry run`), cyan.
pub fn status_info(label: &str, message: &str) {
    emit(Style::new().cyan().bold(), label, message);
}

/// Something skipped or cancelled, yellow.
pub fn status_warn(label: &str, message: &str) {
    emit(Style::new().yellow().bold(), label, message);
}

/// A failed package or an unresolvable plan, red.
pub fn status_error(label: &str, message: &str) {
    emit(Style::new().red().bold(), label, message);
}

/// Spinner for index lookups and environment inspection.
///
/// Hidden when stderr is not a terminal, so piped and JSON runs stay clean.
/// Callers clear it with [`ProgressBar::finish_and_clear`] before printing.
pub fn spinner(message: &str) -> ProgressBar {
    if !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
