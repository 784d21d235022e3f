//! devloop - local development server.
//!
//! Entry point: parses arguments, sets up logging and colours, and dispatches
//! to the selected command.

use clap::Parser;
use devloop_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let no_color = args.no_color || !ui::should_use_color();
    logger::init_logger(args.verbose, args.quiet, no_color);
    ui::init(args.quiet, no_color);

    // No subcommand means "serve with defaults".
    let command = args
        .command
        .unwrap_or_else(|| cli::Command::Serve(cli::ServeArgs::default()));

    let result = match command {
        cli::Command::Serve(serve_args) => commands::serve_execute(serve_args).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
