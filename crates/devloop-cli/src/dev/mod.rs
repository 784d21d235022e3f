//! Development server components.
//!
//! - [`port`] finds the first free port at or above a starting port
//! - [`server`] serves files from the root with caching disabled
//! - [`supervisor`] owns the external watch processes and kills them on exit
//! - [`watcher`] runs the deploy command when a watched file changes
//! - [`config`] resolves CLI flags and `devloop.toml` into a [`ServeConfig`]

pub mod config;
pub mod port;
pub mod server;
pub mod supervisor;
pub mod watcher;

pub use config::ServeConfig;
pub use server::{resolve_path, DevServer, ResolveError};
pub use supervisor::{SharedSupervisor, Supervisor};
pub use watcher::DeployWatcher;

use tokio::sync::watch;

/// Resolve once shutdown has been requested.
///
/// The flag only ever goes from `false` to `true`. A dropped sender counts as
/// a shutdown request.
pub(crate) async fn shutdown_requested(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
