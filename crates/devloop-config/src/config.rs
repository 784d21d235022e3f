//! Top-level configuration structure.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::server::ServerSettings;
use crate::task::{DeploySettings, Preset, TaskSpec};

/// Everything `devloop.toml` can say.
///
/// `tasks` and `deploy` are optional; when absent the preset supplies them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevloopConfig {
    #[serde(default)]
    pub preset: Preset,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskSpec>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy: Option<DeploySettings>,
}

impl DevloopConfig {
    /// Tasks to supervise: the explicit list if one was given, else the preset's.
    pub fn resolved_tasks(&self) -> Vec<TaskSpec> {
        self.tasks.clone().unwrap_or_else(|| self.preset.tasks())
    }

    /// Deploy settings: the explicit section if present, else the preset's.
    pub fn resolved_deploy(&self) -> Option<DeploySettings> {
        self.deploy.clone().or_else(|| self.preset.deploy())
    }

    /// Resolve the serve root against `base` (usually the config file's directory).
    pub fn root_dir(&self, base: &Path) -> PathBuf {
        if self.server.root.is_absolute() {
            self.server.root.clone()
        } else {
            base.join(&self.server.root)
        }
    }
}
