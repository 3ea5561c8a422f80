//! Error types for the tail-stream library.

use thiserror::Error;

/// The main error type for tailing operations.
///
/// Every variant is delivered through the engine's event channel; none of the
/// public lifecycle operations return errors synchronously.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors from stat calls or opening the tailed file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watching errors from the notify crate.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// UTF-8 decoding errors for a range of appended bytes.
    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The separator pattern failed to compile.
    #[error("invalid separator pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The target file did not exist when the watch was started.
    #[error("file does not exist: {path}")]
    NotFound { path: String },

    /// The file was removed or renamed while being watched.
    #[error("file was removed: {path}")]
    Removed { path: String },

    /// Reading a specific byte range of the file failed.
    #[error("failed to read bytes {start}..{end}: {source}")]
    RangeRead {
        start: u64,
        end: u64,
        source: std::io::Error,
    },
}

/// A convenient Result type for tailing operations.
pub type Result<T> = std::result::Result<T, Error>;
