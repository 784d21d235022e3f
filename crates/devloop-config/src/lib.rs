//! Configuration for the devloop development server.
//!
//! A project describes how it wants to be served in an optional `devloop.toml`
//! next to the files it serves. Settings are layered with `figment`:
//! built-in defaults, then the file, then `DEVLOOP_*` environment variables.
//! Command-line overrides are applied on top by the CLI.
//!
//! ```no_run
//! use devloop_config::ConfigDiscovery;
//!
//! let config = ConfigDiscovery::new(".").load().unwrap();
//! for task in config.resolved_tasks() {
//!     println!("{} -> {}", task.name, task.command_line());
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod server;
pub mod task;
pub mod validation;

pub use config::DevloopConfig;
pub use discovery::{CONFIG_FILE_NAME, ConfigDiscovery, ENV_PREFIX};
pub use error::{ConfigError, Result};
pub use server::{DEFAULT_HOST, DEFAULT_PORT, ServerSettings};
pub use task::{DeploySettings, Preset, TaskSpec};
