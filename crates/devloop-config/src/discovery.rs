//! File-based config discovery and layered loading.

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use std::path::{Path, PathBuf};

use crate::config::DevloopConfig;
use crate::error::{ConfigError, Result};

/// Name of the project config file.
pub const CONFIG_FILE_NAME: &str = "devloop.toml";

/// Prefix for environment overrides; `__` separates nested keys
/// (`DEVLOOP_SERVER__PORT=4000`).
pub const ENV_PREFIX: &str = "DEVLOOP_";

/// Finds and loads `devloop.toml`.
///
/// # Example
///
/// ```no_run
/// use devloop_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new("/path/to/site");
/// let config = discovery.load().unwrap();
/// assert_eq!(config.server.host, "127.0.0.1");
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the config file in the root directory, if there is one.
    pub fn find(&self) -> Option<PathBuf> {
        let path = self.root.join(CONFIG_FILE_NAME);
        path.is_file().then_some(path)
    }

    /// Load defaults, the discovered file (if any) and environment overrides.
    ///
    /// A missing config file is not an error here; the defaults apply.
    pub fn load(&self) -> Result<DevloopConfig> {
        let file = self.find();
        match &file {
            Some(path) => tracing::debug!("Loading config from {}", path.display()),
            None => tracing::debug!(
                "No {} in {}, using defaults",
                CONFIG_FILE_NAME,
                self.root.display()
            ),
        }
        Self::extract(file.as_deref())
    }

    /// Load from an explicitly named config file, which must exist.
    pub fn load_from(path: &Path) -> Result<DevloopConfig> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        tracing::debug!("Loading config from {}", path.display());
        Self::extract(Some(path))
    }

    fn extract(file: Option<&Path>) -> Result<DevloopConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(DevloopConfig::default()));

        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment.extract()?)
    }
}
