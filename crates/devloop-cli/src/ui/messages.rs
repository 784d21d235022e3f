//! Status message functions for terminal output.

use owo_colors::OwoColorize;

use super::{is_plain, is_quiet};

/// Print a success message to stderr.
pub fn success(message: &str) {
    if is_quiet() {
        return;
    }
    if is_plain() {
        eprintln!("✓ {}", message);
    } else {
        eprintln!("{} {}", "✓".green().bold(), message);
    }
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    if is_quiet() {
        return;
    }
    if is_plain() {
        eprintln!("ℹ {}", message);
    } else {
        eprintln!("{} {}", "ℹ".blue().bold(), message);
    }
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    if is_plain() {
        eprintln!("⚠ {}", message);
    } else {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    }
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    if is_plain() {
        eprintln!("✗ {}", message);
    } else {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }
}
