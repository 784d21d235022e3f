//! Logging setup for the devloop CLI.
//!
//! Structured logging goes through `tracing`. The level is chosen from the
//! global flags, falling back to `RUST_LOG` and then to INFO.
//!
//! ```rust,no_run
//! use devloop_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Starting server");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Debug-level filter used by `--verbose`.
pub const VERBOSE_FILTER: &str = "devloop=debug,devloop_cli=debug,devloop_config=debug";

/// Errors-only filter used by `--quiet`.
pub const QUIET_FILTER: &str = "devloop=error,devloop_cli=error,devloop_config=error";

/// Filter used when neither a flag nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "devloop=info,devloop_cli=info,devloop_config=info";

/// Initialize the tracing subscriber.
///
/// Call once, before any logging happens.
///
/// # Verbosity Levels
///
/// 1. `--verbose`: DEBUG for devloop crates
/// 2. `--quiet`: ERROR only
/// 3. `RUST_LOG`: custom filter
/// 4. Default: INFO for devloop crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize logger with a custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    // try_init so a second initialization (tests, embedding) is not fatal
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_filter_is_debug() {
        let filter = filter_for(true, false);
        assert!(filter.to_string().contains("devloop_cli=debug"));
    }

    #[test]
    fn test_quiet_filter_is_error() {
        let filter = filter_for(false, true);
        assert!(filter.to_string().contains("devloop=error"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(false, true, true);
    }
}
