//! Mutable session state for one watch: read position and carry-over buffer.

use crate::matcher::{self, Separator};
use crate::queue::ReadRange;

/// Tracks how far into the file content has been delivered, plus any text not
/// yet confirmed to end at a separator boundary.
///
/// `last_position` is monotonically non-decreasing for the lifetime of a watch
/// session; it equals the file size at the most recently observed growth. All
/// mutation happens on the engine's single task.
#[derive(Debug)]
pub(crate) struct TailState {
    last_position: u64,
    buffer: String,
}

impl TailState {
    /// Creates state positioned at `start_position`: `0` when existing
    /// content should be delivered, the current file size otherwise.
    pub(crate) fn new(start_position: u64) -> Self {
        Self {
            last_position: start_position,
            buffer: String::new(),
        }
    }

    pub(crate) fn position(&self) -> u64 {
        self.last_position
    }

    /// Records an observed file size and returns the byte range appended since
    /// the last observation.
    ///
    /// The position advances immediately, before the range is read, so a
    /// second rapid observation produces an adjacent, non-overlapping range.
    /// A size below the current position (a shrunk file) yields `None` and
    /// leaves the position alone; the position never moves backward.
    pub(crate) fn advance_to(&mut self, size: u64) -> Option<ReadRange> {
        if size < self.last_position {
            tracing::debug!(
                size,
                position = self.last_position,
                "file shrank below last position, ignoring"
            );
            return None;
        }

        let range = ReadRange::new(self.last_position, size);
        self.last_position = size;
        Some(range)
    }

    /// Appends newly decoded text to the carry-over buffer and splits off any
    /// lines the separator confirms.
    pub(crate) fn absorb(&mut self, text: &str, separator: &Separator) -> Vec<String> {
        self.buffer.push_str(text);
        matcher::split_lines(&mut self.buffer, separator)
    }
}
