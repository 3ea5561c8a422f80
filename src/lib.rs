//! A tailing library that follows a growing file and emits each newly
//! appended line as it becomes available.
//!
//! The engine tracks its position across file-growth events, reads only the
//! newly appended byte range, and buffers partial lines until a separator
//! confirms them. Change notifications come from the platform's native
//! mechanism or from polling, and everything the engine has to say, lines and
//! failures alike, arrives on one async event stream.
//!
//! # Example
//!
//! ```rust,no_run
//! use tail_stream::{TailEvent, tail_file};
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut tail = tail_file("app.log").await;
//!
//!     while let Some(event) = tail.next().await {
//!         match event {
//!             TailEvent::Line(line) => println!("{line}"),
//!             TailEvent::Error(e) => eprintln!("tail error: {e}"),
//!         }
//!     }
//! }
//! ```

// Internal modules - not part of public API
mod config;
mod error;
mod matcher;
mod queue;
mod reader;
mod state;
mod tail;
mod watcher;

#[cfg(test)]
mod test_helpers;

// Public API exports
pub use config::{TailConfig, WatchMode};
pub use error::{Error, Result};
pub use matcher::Separator;
pub use tail::{Tail, TailEvent};

use std::path::Path;

/// Starts tailing a file with the default configuration: future appends only,
/// native change notifications, lines separated by an optional `\r` followed
/// by `\n`.
///
/// Failures (including a missing file) are delivered on the returned engine's
/// event stream, never returned here. Use [`Tail::new`] with a [`TailConfig`]
/// for anything beyond the defaults.
///
/// ```rust,no_run
/// use tail_stream::{TailEvent, tail_file};
/// use tokio_stream::StreamExt;
///
/// #[tokio::main]
/// async fn main() {
///     let mut tail = tail_file("app.log").await;
///
///     while let Some(event) = tail.next().await {
///         if let TailEvent::Line(line) = event {
///             println!("{line}");
///         }
///     }
/// }
/// ```
pub async fn tail_file<P: AsRef<Path>>(path: P) -> Tail {
    let mut tail = Tail::new(TailConfig::new(path));
    tail.start().await;
    tail
}
