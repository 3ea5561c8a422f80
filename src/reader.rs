//! Byte-range reads over the tailed file.

use crate::queue::ReadRange;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Reads exactly the bytes in `range` from the file.
///
/// Returns raw bytes; decoding happens at the matcher boundary so a decode
/// failure can be reported separately from an I/O failure. A file that grew
/// again since the range was computed is not over-read thanks to `take`.
pub(crate) async fn read_range(path: &Path, range: ReadRange) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(range.start())).await?;

    let mut bytes = Vec::with_capacity(range.len() as usize);
    file.take(range.len()).read_to_end(&mut bytes).await?;
    Ok(bytes)
}
