//! Supervised task definitions and the built-in presets.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One external command run under supervision for the lifetime of the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Display name used in logs and shutdown messages
    pub name: String,

    /// Executable, looked up on `PATH` when not a path
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl TaskSpec {
    pub fn new<I, S>(name: impl Into<String>, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Render the invocation as a single shell-like line for display.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Watch-and-deploy settings.
///
/// Every modification inside the directory containing `watch` launches
/// `script` once, without waiting for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploySettings {
    /// File whose parent directory is watched (non-recursively)
    pub watch: PathBuf,

    /// Deploy executable
    pub script: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl DeploySettings {
    /// The deploy invocation as a task, so it can be supervised like any other.
    pub fn as_task(&self) -> TaskSpec {
        TaskSpec::new("deploy", self.script.clone(), self.args.clone())
    }
}

/// Built-in task layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// One bundler watch plus the type-checker watch.
    #[default]
    Single,
    /// Two bundler watches with separate entries, the type-checker watch,
    /// and a deploy run on every change to the game bundle.
    Split,
}

const TYPECHECK_PROJECT: &str = "ts/tsconfig.json";
const GAME_ENTRY: &str = "static/js/game.js";
const GAME_BUNDLE: &str = "static/js/game.min.js";
const WORKER_ENTRY: &str = "static/js/worker.js";
const WORKER_BUNDLE: &str = "static/js/worker.min.js";
const DEPLOY_SCRIPT: &str = "./_bin/deploy.sh";

impl Preset {
    pub fn tasks(self) -> Vec<TaskSpec> {
        match self {
            Preset::Single => vec![
                bundler_task("esbuild", GAME_ENTRY, GAME_BUNDLE, false),
                typecheck_task(),
            ],
            Preset::Split => vec![
                bundler_task("esbuild-game", GAME_ENTRY, GAME_BUNDLE, true),
                bundler_task("esbuild-worker", WORKER_ENTRY, WORKER_BUNDLE, true),
                typecheck_task(),
            ],
        }
    }

    pub fn deploy(self) -> Option<DeploySettings> {
        match self {
            Preset::Single => None,
            Preset::Split => Some(DeploySettings {
                watch: PathBuf::from(GAME_BUNDLE),
                script: DEPLOY_SCRIPT.to_string(),
                args: vec![],
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Single => "single",
            Preset::Split => "split",
        }
    }
}

fn bundler_task(name: &str, entry: &str, outfile: &str, bundle: bool) -> TaskSpec {
    let mut args = vec![entry.to_string()];
    if bundle {
        args.push("--bundle".to_string());
    }
    args.extend([
        "--watch".to_string(),
        "--minify".to_string(),
        format!("--outfile={}", outfile),
    ]);
    TaskSpec::new(name, "esbuild", args)
}

fn typecheck_task() -> TaskSpec {
    TaskSpec::new("tsc", "tsc", ["-p", TYPECHECK_PROJECT, "--watch"])
}
