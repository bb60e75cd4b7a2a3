//! Checks run on a transcript path before it is read.

use crate::error::{BubbleError, Result};
use std::path::Path;

/// Largest transcript the viewer will load (16 MiB).
pub const MAX_TRANSCRIPT_SIZE: u64 = 16 * 1024 * 1024;

/// Validate that a transcript path points at a readable, reasonably sized regular file.
///
/// # Error Cases
/// - Path does not exist
/// - Path points to a directory or other non-regular file
/// - File is empty (no JSON document to parse)
/// - File is larger than [`MAX_TRANSCRIPT_SIZE`]
pub fn validate_transcript_path(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        BubbleError::file_error(format!("Transcript does not exist: {}", path.display()), e)
    })?;

    if !metadata.is_file() {
        return Err(BubbleError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let size = metadata.len();
    if size == 0 {
        return Err(BubbleError::transcript(format!(
            "file is empty: {}",
            path.display()
        )));
    }
    if size > MAX_TRANSCRIPT_SIZE {
        return Err(BubbleError::TranscriptTooLarge {
            path: path.to_path_buf(),
            size,
        });
    }

    Ok(size)
}
