//! Change-notification backends built on the notify crate.
//!
//! Both backends satisfy the same contract, notify's [`Watcher`] trait, so
//! the engine depends only on [`FileWatcher`] and never on backend details.

use crate::config::WatchMode;
use crate::error::Result;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// What a raw notify event means for the tailed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    /// The file's content or metadata changed; its size is worth sampling.
    Modified,
    /// The file was removed or renamed away.
    Removed,
}

/// Watches the directory containing a single file and surfaces events for it.
///
/// The parent directory is watched non-recursively rather than the file
/// itself so removal and recreation of the file remain visible.
pub(crate) struct FileWatcher {
    watcher: Box<dyn Watcher + Send>,
    receiver: mpsc::UnboundedReceiver<notify::Result<Event>>,
    path: PathBuf,
    file_name: String,
}

impl FileWatcher {
    /// Creates a watcher using the backend selected by `mode`. The watch is
    /// not registered until [`FileWatcher::watch`] is called.
    pub(crate) fn new<P: AsRef<Path>>(
        path: P,
        mode: WatchMode,
        interval: Duration,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let (tx, rx) = mpsc::unbounded_channel();
        let handler = move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        };

        let watcher: Box<dyn Watcher + Send> = match mode {
            WatchMode::Native => Box::new(RecommendedWatcher::new(handler, Config::default())?),
            WatchMode::Polling => Box::new(PollWatcher::new(
                handler,
                Config::default().with_poll_interval(interval),
            )?),
        };

        Ok(Self {
            watcher,
            receiver: rx,
            path,
            file_name,
        })
    }

    /// Registers the watch. Dropping the watcher unregisters it.
    pub(crate) fn watch(&mut self) -> Result<()> {
        let root = watch_root(&self.path);
        tracing::debug!(dir = %root.display(), file = %self.file_name, "registering watch");
        self.watcher.watch(root, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    /// Waits for the next raw event from the backend.
    pub(crate) async fn next_event(&mut self) -> Option<notify::Result<Event>> {
        self.receiver.recv().await
    }

    /// Returns an already-delivered event without waiting, if any.
    pub(crate) fn try_next_event(&mut self) -> Option<notify::Result<Event>> {
        self.receiver.try_recv().ok()
    }
}

/// The directory whose entries are watched on behalf of `path`.
fn watch_root(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Check if a notify event touches a specific file name.
pub(crate) fn event_is_for_file(event: &Event, file_name: &str) -> bool {
    event.paths.iter().any(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy() == file_name)
            .unwrap_or(false)
    })
}

/// Classifies a raw event kind; `None` means the event carries nothing the
/// engine cares about.
pub(crate) fn classify(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Removed),
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any => Some(ChangeKind::Modified),
        EventKind::Access(_) | EventKind::Other => None,
    }
}
