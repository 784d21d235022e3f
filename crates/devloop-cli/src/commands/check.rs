//! Check command implementation.
//!
//! Loads and validates configuration, then shows what `serve` would run
//! without starting anything.

use crate::cli::CheckArgs;
use crate::dev::ServeConfig;
use crate::error::Result;
use crate::ui;
use std::path::{Path, PathBuf};

/// Execute the check command.
///
/// Programs that cannot be found are reported as warnings: the tool may be
/// installed later, or live somewhere only the deploy environment knows.
///
/// # Errors
///
/// Returns errors for configuration that fails to load or validate, and for
/// a serve root that does not exist.
pub async fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking configuration...");

    let config = ServeConfig::from_args(&args.into())?;

    match &config.source {
        Some(path) => ui::info(&format!("Config file: {}", path.display())),
        None => ui::info("No devloop.toml found, using defaults"),
    }
    ui::info(&format!("Serve root: {}", config.root.display()));
    ui::info(&format!(
        "Address: {} (first free port from {})",
        config.host, config.start_port
    ));
    ui::info(&format!("Preset: {}", config.preset.as_str()));

    let mut missing = 0;
    for task in &config.tasks {
        ui::info(&format!("Task {}: {}", task.name, task.command_line()));
        if find_program(&task.program, &config.root).is_none() {
            ui::warning(&format!("  `{}` was not found", task.program));
            missing += 1;
        }
    }
    if config.tasks.is_empty() {
        ui::info("No tasks configured");
    }

    if let Some(deploy) = &config.deploy {
        ui::info(&format!(
            "Deploy: {} on changes in {}",
            deploy.as_task().command_line(),
            deploy.watch.parent().unwrap_or(&config.root).display()
        ));
        if find_program(&deploy.script, &config.root).is_none() {
            ui::warning(&format!("  `{}` was not found", deploy.script));
            missing += 1;
        }
    }

    if missing == 0 {
        ui::success("Configuration is valid!");
    } else {
        ui::warning(&format!(
            "Configuration is valid, but {} program(s) could not be found",
            missing
        ));
    }

    Ok(())
}

/// Locate `program` the way process spawning would.
///
/// Names containing a path separator are resolved against `cwd`; bare names
/// are searched on `PATH`. Either way the result must be executable.
fn find_program(program: &str, cwd: &Path) -> Option<PathBuf> {
    which::which_in(program, std::env::var_os("PATH"), cwd).ok()
}
