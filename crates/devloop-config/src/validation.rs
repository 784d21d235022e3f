//! Logical validation of a loaded configuration.

use std::collections::HashSet;
use std::net::IpAddr;

use crate::config::DevloopConfig;
use crate::error::{ConfigError, Result};
use crate::task::{DeploySettings, TaskSpec};

impl DevloopConfig {
    /// Check the configuration for values that cannot work at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: "0".to_string(),
                hint: "Use a concrete starting port such as 3333".to_string(),
            });
        }

        if self.server.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "server.host".to_string(),
                value: self.server.host.clone(),
                hint: "Use an IP address such as 127.0.0.1".to_string(),
            });
        }

        validate_tasks(&self.resolved_tasks())?;

        if let Some(deploy) = self.resolved_deploy() {
            validate_deploy(&deploy)?;
        }

        Ok(())
    }
}

fn validate_tasks(tasks: &[TaskSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for task in tasks {
        if task.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "tasks.name".to_string(),
                hint: "Give every task a name".to_string(),
            });
        }
        if task.program.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: format!("tasks.{}.program", task.name),
                hint: "Name the executable to run".to_string(),
            });
        }
        if !seen.insert(task.name.as_str()) {
            return Err(ConfigError::DuplicateTask(task.name.clone()));
        }
    }
    Ok(())
}

fn validate_deploy(deploy: &DeploySettings) -> Result<()> {
    if deploy.watch.file_name().is_none() {
        return Err(ConfigError::InvalidValue {
            field: "deploy.watch".to_string(),
            value: deploy.watch.display().to_string(),
            hint: "Point at a file; its directory is watched".to_string(),
        });
    }
    if deploy.script.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: "deploy.script".to_string(),
            hint: "Name the deploy executable".to_string(),
        });
    }
    Ok(())
}
