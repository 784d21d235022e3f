use clap::{Args, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::cli::enums::PresetArg;

/// Available devloop subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve a directory and supervise the build watchers (default)
    ///
    /// Picks the first free port at or above the starting port, starts the
    /// configured watch tasks, serves files with caching disabled and opens
    /// the browser. Ctrl+C stops the server and every task.
    Serve(ServeArgs),

    /// Validate configuration and show what `serve` would run
    Check(CheckArgs),
}

/// Arguments for the serve command.
///
/// Every option overrides the matching `devloop.toml` setting.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Starting port; the first free port at or above it is used [default: 3333]
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Address to bind [default: 127.0.0.1]
    #[arg(long, value_name = "ADDR")]
    pub host: Option<IpAddr>,

    /// Directory to serve [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Config file to use instead of DIR/devloop.toml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Built-in task layout
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Serve only: start no watch tasks and no deploy watcher
    #[arg(long)]
    pub no_tasks: bool,

    /// Do not open the browser
    #[arg(long)]
    pub no_open: bool,

    /// Log one line per request
    #[arg(long)]
    pub log_requests: bool,
}

/// Arguments for the check command
#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Directory that would be served [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Config file to use instead of DIR/devloop.toml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Built-in task layout
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,
}

impl From<CheckArgs> for ServeArgs {
    fn from(args: CheckArgs) -> Self {
        Self {
            dir: args.dir,
            config: args.config,
            preset: args.preset,
            ..Self::default()
        }
    }
}
