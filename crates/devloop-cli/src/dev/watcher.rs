//! Deploy trigger driven by file modifications.
//!
//! Watches the directory containing one file (non-recursively) and calls a
//! callback once for every modification event on a non-directory entry. There
//! is no debouncing: three events mean three calls.

use crate::error::{CliError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

type WatchEvent = notify::Result<Event>;

/// Running watch registration plus the task dispatching its events.
pub struct DeployWatcher {
    /// Dropping the notify watcher stops its internal thread
    _watcher: RecommendedWatcher,
    dir: PathBuf,
    shutdown: watch::Sender<bool>,
    dispatcher: Option<JoinHandle<()>>,
}

impl DeployWatcher {
    /// Start watching the directory that contains `file`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::FileNotFound`] if the directory does not exist and
    /// [`CliError::Watch`] if the watch cannot be registered.
    pub fn start<F>(file: &Path, on_change: F) -> Result<Self>
    where
        F: FnMut(&Path) + Send + 'static,
    {
        let dir = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.is_dir() {
            return Err(CliError::FileNotFound(dir));
        }

        let (tx, rx) = mpsc::channel(100);
        let mut watcher = notify::recommended_watcher(move |res: WatchEvent| {
            // Fails only once the dispatcher is gone, i.e. during shutdown.
            let _ = tx.blocking_send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let (shutdown, shutdown_rx) = watch::channel(false);
        let dispatcher = tokio::spawn(dispatch(rx, shutdown_rx, on_change));

        tracing::debug!(dir = %dir.display(), "Watching for changes");

        Ok(Self {
            _watcher: watcher,
            dir,
            shutdown,
            dispatcher: Some(dispatcher),
        })
    }

    /// Directory being watched.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stop dispatching and wait for the dispatcher task to finish.
    pub async fn stop(mut self) {
        self.shutdown.send_replace(true);
        if let Some(dispatcher) = self.dispatcher.take() {
            if let Err(err) = dispatcher.await {
                tracing::warn!("Watcher task ended abnormally: {}", err);
            }
        }
    }
}

impl Drop for DeployWatcher {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

/// Deliver modification events to `on_change` until shutdown or until the
/// event source goes away.
async fn dispatch<F>(
    mut events: mpsc::Receiver<WatchEvent>,
    shutdown: watch::Receiver<bool>,
    mut on_change: F,
) where
    F: FnMut(&Path),
{
    let stop = super::shutdown_requested(shutdown);
    tokio::pin!(stop);

    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            event = events.recv() => match event {
                Some(Ok(event)) => {
                    if let Some(path) = modified_file(&event) {
                        tracing::debug!(path = %path.display(), "File modified");
                        on_change(&path);
                    }
                }
                Some(Err(err)) => tracing::warn!("File watch error: {}", err),
                None => break,
            },
        }
    }
}

/// The modified non-directory entry an event refers to, if it is a
/// modification at all.
fn modified_file(event: &Event) -> Option<PathBuf> {
    if !matches!(event.kind, EventKind::Modify(_)) {
        return None;
    }
    event.paths.iter().find(|path| !path.is_dir()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn modify(path: &Path) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(path.to_path_buf())
    }

    #[test]
    fn test_modified_file_accepts_modify_events() {
        let path = PathBuf::from("/srv/static/js/game.min.js");
        assert_eq!(modified_file(&modify(&path)), Some(path));
    }

    #[test]
    fn test_modified_file_ignores_other_kinds() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/srv/new.js"));
        assert_eq!(modified_file(&event), None);
    }

    #[test]
    fn test_modified_file_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(modified_file(&modify(dir.path())), None);
    }

    #[tokio::test]
    async fn test_one_call_per_event() {
        let (tx, rx) = mpsc::channel(100);
        let (_shutdown, shutdown_rx) = watch::channel(false);
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);

        let path = PathBuf::from("/srv/static/js/game.min.js");
        for _ in 0..3 {
            tx.send(Ok(modify(&path))).await.unwrap();
        }
        tx.send(Ok(Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone())))
            .await
            .unwrap();
        drop(tx);

        dispatch(rx, shutdown_rx, move |p: &Path| {
            seen.lock().unwrap().push(p.to_path_buf())
        })
        .await;

        assert_eq!(*calls.lock().unwrap(), vec![path.clone(), path.clone(), path]);
    }

    #[tokio::test]
    async fn test_shutdown_wakes_dispatcher() {
        let (_tx, rx) = mpsc::channel::<WatchEvent>(100);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(dispatch(rx, shutdown_rx, |_: &Path| {}));
        shutdown.send_replace(true);

        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("dispatcher should stop promptly")
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing").join("game.min.js");

        match DeployWatcher::start(&file, |_| {}) {
            Err(CliError::FileNotFound(path)) => assert_eq!(path, dir.path().join("missing")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("watching a missing directory should fail"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_real_modification_triggers_callback() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("game.min.js");
        std::fs::write(&file, "// v1").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let watcher = DeployWatcher::start(&file, move |path| {
            let _ = tx.send(path.to_path_buf());
        })
        .unwrap();
        assert_eq!(watcher.dir(), dir.path());

        // Give the backend a moment to register before writing.
        tokio::time::sleep(Duration::from_millis(100)).await;
        std::fs::write(&file, "// v2").unwrap();

        let changed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("expected a modification event")
            .unwrap();
        assert_eq!(changed.file_name(), file.file_name());

        watcher.stop().await;
    }
}
