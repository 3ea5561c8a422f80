//! Construction parameters for a tailing engine.

use crate::matcher::Separator;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Polling period used when no interval is configured.
const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

/// How change notifications are obtained for the watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchMode {
    /// The platform's native notification mechanism (inotify, FSEvents, ...).
    #[default]
    Native,
    /// Periodic metadata polling; heavier, but works where native watches
    /// do not and notices a removed file being recreated.
    Polling,
}

/// Configuration for a [`Tail`](crate::Tail) engine.
///
/// Only the path is required; every other field has a default matching the
/// common log-tailing case: future appends only, native notifications, a 5
/// second polling interval, and lines separated by an optional `\r` followed
/// by `\n`.
#[derive(Debug, Clone)]
pub struct TailConfig {
    pub(crate) path: PathBuf,
    pub(crate) from_beginning: bool,
    pub(crate) watch_mode: WatchMode,
    pub(crate) interval: Duration,
    pub(crate) separator: Separator,
}

impl TailConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            from_beginning: false,
            watch_mode: WatchMode::default(),
            interval: DEFAULT_INTERVAL,
            separator: Separator::default(),
        }
    }

    /// Deliver content already present in the file when the watch starts,
    /// instead of only future appends.
    pub fn from_beginning(mut self, from_beginning: bool) -> Self {
        self.from_beginning = from_beginning;
        self
    }

    /// Select the change-notification backend.
    pub fn watch_mode(mut self, mode: WatchMode) -> Self {
        self.watch_mode = mode;
        self
    }

    /// Polling period; only relevant in [`WatchMode::Polling`].
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Use a custom line-separator pattern.
    pub fn separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
