//! Error handling for the devloop CLI.
//!
//! A single top-level `CliError` collects every failure a command can hit.
//! Domain errors from configuration loading and port allocation convert into it
//! via `#[from]`, and `main` turns it into a `miette` report.
//!
//! Everything here is fatal: the tool fails fast at startup instead of
//! retrying. Errors that happen while serving (a deploy run that cannot be
//! spawned, a watch error) are logged where they occur instead.
//!
//! # Example
//!
//! ```rust,no_run
//! use devloop_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_index(root: &Path) -> Result<String> {
//!     let path = root.join("index.html");
//!     std::fs::read_to_string(&path).with_path(&path)
//! }
//! ```

mod report;

use std::path::PathBuf;
use thiserror::Error;

use crate::dev::port::PortError;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or validating `devloop.toml` failed
    #[error("Configuration error: {0}")]
    Config(#[from] devloop_config::ConfigError),

    /// No port could be allocated
    #[error("Port allocation failed: {0}")]
    Port(#[from] PortError),

    /// A supervised task could not be started
    #[error("Failed to start task '{task}' ({program}): {source}")]
    Spawn {
        task: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP listener errors
    #[error("Server error: {0}")]
    Server(String),

    /// Registering the file watch failed
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}
