//! Supervision of the external watch processes.
//!
//! The supervisor is the sole owner of every child it starts. Children are
//! killed and reaped when [`Supervisor::shutdown`] runs or when the
//! supervisor is dropped, whichever comes first, so an early return on an
//! error path cleans up the same way a normal exit does. A hard kill of
//! devloop itself still leaves children behind; nothing in-process can
//! prevent that.

use crate::error::{CliError, Result};
use crate::ui;
use devloop_config::TaskSpec;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;

/// Supervisor shared between the lifecycle and the deploy callback.
pub type SharedSupervisor = Arc<Mutex<Supervisor>>;

struct SupervisedChild {
    name: String,
    child: Child,
}

/// Owns running child processes and terminates each exactly once.
pub struct Supervisor {
    cwd: PathBuf,
    children: Vec<SupervisedChild>,
}

impl Supervisor {
    /// Create an empty supervisor whose children run in `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            children: Vec::new(),
        }
    }

    /// Start every task, failing fast on the first one that cannot start.
    ///
    /// Tasks started before the failure are killed when the partially
    /// filled supervisor is dropped on the error path.
    pub fn spawn_all(cwd: impl Into<PathBuf>, tasks: &[TaskSpec]) -> Result<Self> {
        let mut supervisor = Self::new(cwd);
        for task in tasks {
            supervisor.spawn(task)?;
        }
        Ok(supervisor)
    }

    /// Start one task without waiting for it. Returns the child's pid.
    pub fn spawn(&mut self, task: &TaskSpec) -> Result<u32> {
        let child = Command::new(&task.program)
            .args(&task.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| CliError::Spawn {
                task: task.name.clone(),
                program: task.program.clone(),
                source,
            })?;

        let pid = child.id();
        tracing::debug!(task = %task.name, pid, "Started `{}`", task.command_line());
        self.children.push(SupervisedChild {
            name: task.name.clone(),
            child,
        });
        Ok(pid)
    }

    /// Start a fire-and-forget task, first forgetting children that already exited.
    pub fn launch(&mut self, task: &TaskSpec) -> Result<u32> {
        self.reap_exited();
        self.spawn(task)
    }

    fn reap_exited(&mut self) {
        self.children.retain_mut(|supervised| match supervised.child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!(task = %supervised.name, %status, "Task exited");
                false
            }
            _ => true,
        });
    }

    /// Names of the tasks currently tracked, in start order.
    pub fn names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }

    /// Kill and reap every tracked child that is still running.
    ///
    /// Returns the names of the tasks that were terminated. Children that
    /// already exited are reaped silently and left out. Each child is removed
    /// as it is handled, so calling this again returns nothing.
    pub fn shutdown(&mut self) -> Vec<String> {
        let mut terminated = Vec::with_capacity(self.children.len());

        for mut supervised in self.children.drain(..) {
            if let Ok(Some(status)) = supervised.child.try_wait() {
                tracing::debug!(task = %supervised.name, %status, "Task already exited");
                continue;
            }

            ui::info(&format!("Terminating {} process ...", supervised.name));

            if let Err(err) = supervised.child.kill() {
                // Exited between the check and the kill.
                tracing::debug!(task = %supervised.name, "kill: {}", err);
            }
            match supervised.child.wait() {
                Ok(status) => tracing::debug!(task = %supervised.name, %status, "Task stopped"),
                Err(err) => tracing::warn!(task = %supervised.name, "Failed to reap task: {}", err),
            }

            terminated.push(supervised.name);
        }

        terminated
    }

    /// Wrap in the shared handle used across tasks.
    pub fn into_shared(self) -> SharedSupervisor {
        Arc::new(Mutex::new(self))
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        if !self.children.is_empty() {
            self.shutdown();
        }
    }
}
