//! Resolved settings for one `serve` run.
//!
//! Loads `devloop.toml` (discovered in the serve directory or named with
//! `--config`), applies the command-line overrides on top, validates the
//! result and turns paths into absolute ones.

use crate::cli::ServeArgs;
use crate::error::{CliError, Result, ResultExt};
use devloop_config::{ConfigDiscovery, DeploySettings, DevloopConfig, Preset, TaskSpec};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Everything the lifecycle needs, with CLI flags already applied.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Canonical serve root; also the working directory of every task
    pub root: PathBuf,
    pub host: IpAddr,
    /// First port tried by the allocator
    pub start_port: u16,
    pub open: bool,
    pub log_requests: bool,
    pub preset: Preset,
    pub tasks: Vec<TaskSpec>,
    /// Deploy settings with `watch` resolved against `root`
    pub deploy: Option<DeploySettings>,
    /// Config file that was loaded, if any
    pub source: Option<PathBuf>,
}

impl ServeConfig {
    /// Build the run configuration from command-line arguments.
    ///
    /// # Errors
    ///
    /// Configuration that fails to load or validate, a `--config` file that
    /// does not exist, or a serve root that is missing or not a directory.
    pub fn from_args(args: &ServeArgs) -> Result<Self> {
        let base = match &args.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let (mut config, source) = load(&base, args.config.as_deref())?;

        let config_dir = source
            .as_deref()
            .and_then(Path::parent)
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| base.clone());

        apply_overrides(&mut config, args);
        config.validate()?;

        let root = match &args.dir {
            Some(dir) => dir.clone(),
            None => config.root_dir(&config_dir),
        };
        let root = std::fs::canonicalize(&root)
            .with_path(&root)
            .with_hint("Pass an existing directory with --dir")?;
        if !root.is_dir() {
            return Err(CliError::InvalidArgument(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let host = config.server.host.parse::<IpAddr>().map_err(|_| {
            CliError::InvalidArgument(format!("invalid host '{}'", config.server.host))
        })?;

        let (tasks, deploy) = if args.no_tasks {
            (Vec::new(), None)
        } else {
            let deploy = config.resolved_deploy().map(|deploy| DeploySettings {
                watch: root.join(&deploy.watch),
                ..deploy
            });
            (config.resolved_tasks(), deploy)
        };

        Ok(Self {
            root,
            host,
            start_port: config.server.port,
            open: config.server.open,
            log_requests: config.server.log_requests,
            preset: config.preset,
            tasks,
            deploy,
            source,
        })
    }

    /// Socket address to bind once a port has been allocated.
    pub fn bind_addr(&self, port: u16) -> SocketAddr {
        SocketAddr::new(self.host, port)
    }

    /// URL to open in the browser for `port`.
    ///
    /// A wildcard bind address is replaced by loopback.
    pub fn server_url(&self, port: u16) -> String {
        let host = if self.host.is_unspecified() {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
        };
        format!("http://{}", SocketAddr::new(host, port))
    }
}

fn load(base: &Path, explicit: Option<&Path>) -> Result<(DevloopConfig, Option<PathBuf>)> {
    match explicit {
        Some(path) => {
            let config = ConfigDiscovery::load_from(path)
                .context(format!("Failed to load {}", path.display()))?;
            Ok((config, Some(path.to_path_buf())))
        }
        None => {
            let discovery = ConfigDiscovery::new(base);
            let config = discovery.load()?;
            Ok((config, discovery.find()))
        }
    }
}

fn apply_overrides(config: &mut DevloopConfig, args: &ServeArgs) {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host.to_string();
    }
    if let Some(preset) = args.preset {
        config.preset = preset.into();
    }
    if args.no_open {
        config.server.open = false;
    }
    if args.log_requests {
        config.server.log_requests = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PresetArg;
    use std::fs;

    fn args_for(dir: &Path) -> ServeArgs {
        ServeArgs {
            dir: Some(dir.to_path_buf()),
            ..ServeArgs::default()
        }
    }

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServeConfig::from_args(&args_for(dir.path())).unwrap();

        assert_eq!(config.root, fs::canonicalize(dir.path()).unwrap());
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.start_port, 3333);
        assert!(config.open);
        assert!(!config.log_requests);
        assert_eq!(config.preset, Preset::Single);
        assert_eq!(config.tasks.len(), 2);
        assert!(config.deploy.is_none());
        assert!(config.source.is_none());
    }

    #[test]
    fn test_config_file_is_discovered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("devloop.toml"),
            r#"
[server]
port = 8080
open = false

[[tasks]]
name = "sass"
program = "sass"
args = ["--watch", "scss:css"]
"#,
        )
        .unwrap();

        let config = ServeConfig::from_args(&args_for(dir.path())).unwrap();
        assert_eq!(config.start_port, 8080);
        assert!(!config.open);
        assert_eq!(config.tasks.len(), 1);
        assert_eq!(config.tasks[0].name, "sass");
        assert_eq!(config.source, Some(dir.path().join("devloop.toml")));
    }

    #[test]
    fn test_cli_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("devloop.toml"), "[server]\nport = 8080\n").unwrap();

        let args = ServeArgs {
            port: Some(9000),
            host: Some("0.0.0.0".parse().unwrap()),
            no_open: true,
            log_requests: true,
            ..args_for(dir.path())
        };
        let config = ServeConfig::from_args(&args).unwrap();
        assert_eq!(config.start_port, 9000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert!(!config.open);
        assert!(config.log_requests);
    }

    #[test]
    fn test_split_preset_resolves_deploy_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let args = ServeArgs {
            preset: Some(PresetArg::Split),
            ..args_for(dir.path())
        };
        let config = ServeConfig::from_args(&args).unwrap();

        assert_eq!(config.tasks.len(), 3);
        let deploy = config.deploy.expect("split preset deploys");
        assert_eq!(deploy.watch, config.root.join("static/js/game.min.js"));
    }

    #[test]
    fn test_no_tasks_disables_tasks_and_deploy() {
        let dir = tempfile::tempdir().unwrap();
        let args = ServeArgs {
            preset: Some(PresetArg::Split),
            no_tasks: true,
            ..args_for(dir.path())
        };
        let config = ServeConfig::from_args(&args).unwrap();
        assert!(config.tasks.is_empty());
        assert!(config.deploy.is_none());
    }

    #[test]
    fn test_root_from_config_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("public")).unwrap();
        let config_path = dir.path().join("devloop.toml");
        fs::write(&config_path, "[server]\nroot = \"public\"\n").unwrap();

        let args = ServeArgs {
            config: Some(config_path),
            ..ServeArgs::default()
        };
        let config = ServeConfig::from_args(&args).unwrap();
        assert_eq!(config.root, fs::canonicalize(dir.path().join("public")).unwrap());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = ServeArgs {
            config: Some(dir.path().join("nope.toml")),
            ..args_for(dir.path())
        };
        let err = ServeConfig::from_args(&args).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = ServeConfig::from_args(&args_for(&missing)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing"));
        assert!(msg.contains("Hint: Pass an existing directory with --dir"));
    }

    #[test]
    fn test_port_zero_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = ServeArgs {
            port: Some(0),
            ..args_for(dir.path())
        };
        let err = ServeConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_server_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServeConfig::from_args(&args_for(dir.path())).unwrap();
        assert_eq!(config.server_url(3334), "http://127.0.0.1:3334");

        config.host = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        assert_eq!(config.server_url(3334), "http://127.0.0.1:3334");

        config.host = "::1".parse().unwrap();
        assert_eq!(config.server_url(3334), "http://[::1]:3334");
        assert_eq!(config.bind_addr(3334).port(), 3334);
    }
}
