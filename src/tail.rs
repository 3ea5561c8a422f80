//! The tailing engine: lifecycle, change handling, and queue draining.

use crate::config::TailConfig;
use crate::error::Error;
use crate::matcher::Separator;
use crate::queue::ReadQueue;
use crate::reader;
use crate::state::TailState;
use crate::watcher::{ChangeKind, FileWatcher, classify, event_is_for_file};
use futures::Stream;
use notify::Event;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// An event emitted by a [`Tail`] engine.
#[derive(Debug)]
pub enum TailEvent {
    /// One decoded line, separator stripped. Empty lines are suppressed.
    Line(String),
    /// A reported failure; the engine keeps watching unless it never started.
    Error(Error),
}

/// Lifecycle of an engine. Stopped is terminal; a stopped engine is not
/// restartable, construct a fresh instance instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Watching,
    Stopped,
}

/// Follows a growing file and emits each newly appended line.
///
/// `Tail` is both the lifecycle handle (`start`/`stop`) and the event stream:
/// it implements [`Stream`] yielding [`TailEvent`] values. Failures are
/// delivered on that stream too; `start` and `stop` never report errors
/// synchronously. Instances watching the same path are independent.
pub struct Tail {
    config: TailConfig,
    phase: Phase,
    active: Arc<AtomicBool>,
    events_tx: Option<mpsc::UnboundedSender<TailEvent>>,
    events_rx: mpsc::UnboundedReceiver<TailEvent>,
    shutdown_tx: broadcast::Sender<()>,
    _task: Option<JoinHandle<()>>,
}

impl Tail {
    pub fn new(config: TailConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            phase: Phase::Idle,
            active: Arc::new(AtomicBool::new(false)),
            events_tx: Some(events_tx),
            events_rx,
            shutdown_tx,
            _task: None,
        }
    }

    /// Begins watching the file. A no-op if already watching or stopped.
    ///
    /// If the file does not exist, or the watch backend cannot be registered,
    /// an error event is emitted and the engine stays idle; a later `start`
    /// may succeed once the file exists.
    pub async fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }

        let path = self.config.path().to_path_buf();
        let size = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.emit(Error::NotFound {
                    path: path.display().to_string(),
                });
                return;
            }
            Err(e) => {
                self.emit(Error::Io(e));
                return;
            }
        };

        let mut watcher = match FileWatcher::new(
            &path,
            self.config.watch_mode,
            self.config.interval,
        ) {
            Ok(watcher) => watcher,
            Err(e) => {
                self.emit(e);
                return;
            }
        };
        if let Err(e) = watcher.watch() {
            self.emit(e);
            return;
        }

        let Some(events) = self.events_tx.clone() else {
            return;
        };

        let start_position = if self.config.from_beginning { 0 } else { size };
        self.active.store(true, Ordering::SeqCst);

        let core = EngineCore {
            file_name: watched_file_name(&path),
            path,
            separator: self.config.separator.clone(),
            state: TailState::new(start_position),
            queue: ReadQueue::new(),
            active: Arc::clone(&self.active),
            events,
        };

        let shutdown_rx = self.shutdown_tx.subscribe();
        let from_beginning = self.config.from_beginning;
        self._task = Some(tokio::spawn(run(core, watcher, shutdown_rx, from_beginning)));
        self.phase = Phase::Watching;
    }

    /// Stops watching. A no-op unless currently watching.
    ///
    /// The active flag is cleared before the shutdown signal is sent, so no
    /// new range can be queued once this returns; a read already in flight is
    /// not cancelled and may still emit. The event stream terminates after
    /// any remaining buffered events.
    pub fn stop(&mut self) {
        if self.phase != Phase::Watching {
            return;
        }

        self.active.store(false, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
        self.events_tx = None;
        self.phase = Phase::Stopped;
    }

    pub fn is_watching(&self) -> bool {
        self.phase == Phase::Watching
    }

    fn emit(&self, error: Error) {
        if let Some(tx) = &self.events_tx {
            let _ = tx.send(TailEvent::Error(error));
        }
    }
}

impl Drop for Tail {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Stream for Tail {
    type Item = TailEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.events_rx).poll_recv(cx)
    }
}

fn watched_file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// All mutable session state, owned by the engine task. Notifications and
/// reads are handled on this one task, so the state needs no locking.
struct EngineCore {
    path: PathBuf,
    file_name: String,
    separator: Separator,
    state: TailState,
    queue: ReadQueue,
    active: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<TailEvent>,
}

impl EngineCore {
    fn emit_line(&self, line: String) {
        let _ = self.events.send(TailEvent::Line(line));
    }

    fn emit_error(&self, error: Error) {
        tracing::warn!(path = %self.path.display(), %error, "tail error");
        let _ = self.events.send(TailEvent::Error(error));
    }

    /// Samples the file size and queues the range appended since the last
    /// observation. The size comes from a fresh stat, never from an event
    /// payload, so rapid successive writes produce adjacent ranges.
    async fn observe_change(&mut self) {
        if !self.active.load(Ordering::SeqCst) {
            return;
        }

        let size = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                self.emit_error(Error::Io(e));
                return;
            }
        };

        if let Some(range) = self.state.advance_to(size) {
            tracing::debug!(start = range.start(), end = range.end(), "queueing range");
            self.queue.push(range);
        }
    }

    async fn handle_event(&mut self, event: notify::Result<Event>) {
        match event {
            Ok(event) => {
                if !event_is_for_file(&event, &self.file_name) {
                    return;
                }
                match classify(&event.kind) {
                    Some(ChangeKind::Modified) => self.observe_change().await,
                    Some(ChangeKind::Removed) => self.emit_error(Error::Removed {
                        path: self.path.display().to_string(),
                    }),
                    None => {}
                }
            }
            Err(e) => self.emit_error(Error::Watch(e)),
        }
    }

    /// Consumes queued ranges strictly one at a time; the next range starts
    /// only after the previous read completed. A failed range is reported and
    /// skipped, never stalling the queue, and the position is not rolled
    /// back.
    async fn drain(&mut self, watcher: &mut FileWatcher) {
        while let Some(range) = self.queue.pop() {
            if !range.is_empty() {
                match reader::read_range(&self.path, range).await {
                    Ok(bytes) => match String::from_utf8(bytes) {
                        Ok(text) => {
                            for line in self.state.absorb(&text, &self.separator) {
                                self.emit_line(line);
                            }
                        }
                        Err(e) => self.emit_error(Error::Utf8(e)),
                    },
                    Err(source) => self.emit_error(Error::RangeRead {
                        start: range.start(),
                        end: range.end(),
                        source,
                    }),
                }
            }

            // Notifications that arrived during the read queue their ranges
            // now, behind the one just consumed.
            while let Some(event) = watcher.try_next_event() {
                self.handle_event(event).await;
            }
        }
    }
}

/// The engine task: a single logical stream of control per instance.
async fn run(
    mut core: EngineCore,
    mut watcher: FileWatcher,
    mut shutdown: broadcast::Receiver<()>,
    from_beginning: bool,
) {
    if from_beginning {
        // Pre-existing content is read once, as if the file had just grown
        // from empty.
        core.observe_change().await;
        core.drain(&mut watcher).await;
    }

    loop {
        tokio::select! {
            biased;

            _ = shutdown.recv() => break,

            event = watcher.next_event() => match event {
                Some(event) => {
                    core.handle_event(event).await;
                    core.drain(&mut watcher).await;
                }
                None => break,
            },
        }
    }

    tracing::debug!(path = %core.path.display(), "watch loop finished");
}
