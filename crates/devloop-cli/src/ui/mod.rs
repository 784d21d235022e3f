//! Terminal status output.
//!
//! Short, human-facing status lines on stderr (`✓ Serving ...`). Detailed
//! diagnostics go through `tracing` instead.
//!
//! ```no_run
//! use devloop_cli::ui;
//!
//! ui::init(false, false);
//! ui::info("Starting development server...");
//! ui::success("Development server stopped");
//! ```

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use messages::{error, info, success, warning};

static QUIET: AtomicBool = AtomicBool::new(false);
static PLAIN: AtomicBool = AtomicBool::new(false);

/// Configure output once, from the global flags.
///
/// `quiet` hides info and success lines (warnings and errors still show);
/// `no_color` prints glyphs without ANSI colours.
pub fn init(quiet: bool, no_color: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
    PLAIN.store(no_color, Ordering::Relaxed);
}

pub(crate) fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub(crate) fn is_plain() -> bool {
    PLAIN.load(Ordering::Relaxed)
}

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, then falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}
