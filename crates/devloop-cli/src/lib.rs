//! devloop - a local development server for static web projects.
//!
//! Serves a directory over HTTP with caching disabled, keeps external
//! build watchers (a bundler and a type-checker) running for as long as the
//! server is up, and can run a deploy script whenever a built file changes.
//!
//! # Architecture
//!
//! - [`dev`] - the server components: port allocation, the static file
//!   responder, the process supervisor and the deploy watcher
//! - [`commands`] - `serve` (the lifecycle controller) and `check`
//! - [`cli`] - argument definitions
//! - [`error`] - error types and diagnostic reporting
//! - [`logger`] / [`ui`] - structured logging and terminal status lines
//!
//! # Example
//!
//! ```rust,no_run
//! use devloop_cli::dev::port::find_free_port;
//!
//! let port = find_free_port(3333).expect("a free port");
//! println!("serving on {port}");
//! ```

pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
