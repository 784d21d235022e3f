//! Miette diagnostic conversion for CLI errors.

use crate::dev::port::PortError;
use crate::error::CliError;
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Spawn {
            task,
            program,
            source,
        } => miette::miette!(
            help = format!("Is `{}` installed and on your PATH?", program),
            "Failed to start task '{}': {}",
            task,
            source
        ),
        CliError::Port(PortError::Exhausted { start }) => miette::miette!(
            help = "Stop some local servers or pass a different --port",
            "No free port between {} and 65535",
            start
        ),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_report_carries_help() {
        let report = cli_error_to_miette(CliError::Spawn {
            task: "tsc".into(),
            program: "tsc".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        });
        assert!(report.to_string().contains("Failed to start task 'tsc'"));
        let help = report.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("`tsc`"));
    }

    #[test]
    fn other_errors_keep_their_message() {
        let report = cli_error_to_miette(CliError::Server("bind failed".into()));
        assert_eq!(report.to_string(), "Server error: bind failed");
    }
}
