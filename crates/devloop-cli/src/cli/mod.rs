//! Command-line interface definition.
//!
//! # Command Structure
//!
//! - `devloop` / `devloop serve` - serve a directory and supervise the watchers
//! - `devloop check` - validate configuration and show what would run

mod commands;
pub mod enums;
mod tests;

use clap::Parser;

pub use commands::{CheckArgs, Command, ServeArgs};
pub use enums::PresetArg;

/// devloop - local development server with supervised build watchers
#[derive(Parser, Debug)]
#[command(
    name = "devloop",
    version,
    about = "Local development server with supervised build watchers",
    long_about = "devloop serves a directory over HTTP with caching disabled, keeps the\n\
                  bundler and type-checker watchers running while it is up, and can run a\n\
                  deploy script whenever a built file changes.\n\n\
                  Run without arguments to serve the current directory."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}
