//! HTTP server settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// First port tried when looking for a free one.
pub const DEFAULT_PORT: u16 = 3333;

/// Loopback address the server binds to by default.
pub const DEFAULT_HOST: &str = "127.0.0.1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address the HTTP listener binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Starting port for the free-port search
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory to serve, relative to the config file's directory
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Open the default browser once the server is up
    #[serde(default = "default_open")]
    pub open: bool,

    /// Emit one log line per request (off by default)
    #[serde(default)]
    pub log_requests: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root: default_root(),
            open: default_open(),
            log_requests: false,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.into()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_open() -> bool {
    true
}
