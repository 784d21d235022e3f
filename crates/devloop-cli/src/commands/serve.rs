//! Serve command: the development server lifecycle.
//!
//! Startup order is fixed:
//! - allocate the first free port at or above the starting port
//! - start the supervised watch tasks
//! - start the deploy watcher, if one is configured
//! - start the HTTP server on a background task
//! - open the browser
//!
//! Then block until interrupted. Shutdown runs in reverse: stop the server
//! (in-flight requests finish), stop the watcher, kill every task.

use crate::cli::ServeArgs;
use crate::dev::port::find_free_port;
use crate::dev::server::static_router;
use crate::dev::{DeployWatcher, DevServer, ServeConfig, SharedSupervisor, Supervisor};
use crate::error::{CliError, Result};
use crate::ui;
use devloop_config::DeploySettings;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;

/// What a completed run did, for reporting and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeReport {
    /// Port the server listened on
    pub port: u16,
    /// Tasks terminated at shutdown, in start order
    pub stopped_tasks: Vec<String>,
}

/// Execute the serve command.
///
/// # Errors
///
/// Configuration errors, port exhaustion, a task that cannot be started, or
/// a listener that cannot be bound. All of these happen before serving
/// starts; anything already started is cleaned up first.
pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = ServeConfig::from_args(&args)?;
    run(config, |_| wait_for_interrupt()).await?;
    Ok(())
}

/// Run the lifecycle until `interrupt` completes.
///
/// `interrupt` receives the bound address once the server is accepting
/// connections; its future resolving is the shutdown request.
pub async fn run<F, Fut>(config: ServeConfig, interrupt: F) -> Result<ServeReport>
where
    F: FnOnce(SocketAddr) -> Fut,
    Fut: Future<Output = ()>,
{
    let port = find_free_port(config.start_port)?;
    if port != config.start_port {
        ui::warning(&format!(
            "Port {} is in use, using {} instead",
            config.start_port, port
        ));
    }

    // Dropping the supervisor kills whatever it started, so every `?` below
    // cleans up the tasks.
    let supervisor = Supervisor::spawn_all(&config.root, &config.tasks)?;
    for task in &config.tasks {
        ui::info(&format!("Started {}: {}", task.name, task.command_line()));
    }
    tracing::debug!(tasks = ?supervisor.names(), "Supervising");
    let supervisor = supervisor.into_shared();

    let watcher = match &config.deploy {
        Some(deploy) => Some(start_deploy_watcher(deploy, &supervisor)?),
        None => None,
    };

    let app = static_router(config.root.clone(), config.log_requests);
    let server = DevServer::bind(config.bind_addr(port), app).await?;
    let addr = server.local_addr()?;
    let url = config.server_url(addr.port());

    if !config.log_requests {
        ui::info("Request logging disabled (use --log-requests to enable)");
    }
    ui::success(&format!("Serving {} at {}", config.root.display(), url));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut server_task = tokio::spawn(server.serve(shutdown_rx));

    if config.open {
        open_browser(&url);
    }
    ui::info("Press Ctrl+C to stop");

    let interrupted = interrupt(addr);
    tokio::pin!(interrupted);

    let early_exit = tokio::select! {
        _ = &mut interrupted => None,
        joined = &mut server_task => Some(joined),
    };

    shutdown_tx.send_replace(true);
    let joined = match early_exit {
        None => {
            ui::info("Shutting down development server...");
            server_task.await
        }
        Some(joined) => {
            ui::warning("Server task completed unexpectedly");
            joined
        }
    };

    if let Some(watcher) = watcher {
        watcher.stop().await;
    }
    let stopped_tasks = supervisor.lock().shutdown();

    joined.map_err(|e| CliError::Server(format!("server task failed: {}", e)))??;

    ui::success("Development server stopped");
    Ok(ServeReport {
        port: addr.port(),
        stopped_tasks,
    })
}

/// Watch the deploy file and launch the deploy command on every change.
fn start_deploy_watcher(
    deploy: &DeploySettings,
    supervisor: &SharedSupervisor,
) -> Result<DeployWatcher> {
    let task = deploy.as_task();
    let supervisor = Arc::clone(supervisor);

    let watcher = DeployWatcher::start(&deploy.watch, move |path| {
        ui::info(&format!(
            "{} changed, running {}",
            path.display(),
            task.command_line()
        ));
        // Deploy runs are fire-and-forget; a failure to start one is not fatal.
        if let Err(err) = supervisor.lock().launch(&task) {
            ui::error(&format!("Deploy did not start: {}", err));
        }
    })?;

    ui::info(&format!("Watching {} for changes", watcher.dir().display()));
    Ok(watcher)
}

/// Resolve on Ctrl+C, or on SIGTERM where there is one.
async fn wait_for_interrupt() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};

        match unix_signal(SignalKind::terminate()) {
            Ok(terminate) => return ctrl_c_or_terminate(terminate).await,
            Err(err) => tracing::warn!("Cannot listen for SIGTERM: {}", err),
        }
    }

    if let Err(err) = signal::ctrl_c().await {
        // Without a signal handler the only way out is killing the process.
        tracing::warn!("Cannot listen for Ctrl+C: {}", err);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn ctrl_c_or_terminate(mut terminate: signal::unix::Signal) {
    tokio::select! {
        _ = signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

/// Open the server URL in the default browser.
///
/// Uses platform-specific commands:
/// - macOS: `open`
/// - Windows: `start`
/// - Linux: `xdg-open`
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", "", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {}", url)),
        Err(e) => ui::warning(&format!("Failed to open browser: {}", e)),
    }
}
