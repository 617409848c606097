//! Synchronous document I/O.
//!
//! Reads are guarded by a size limit and a binary sniff; writes go through a
//! sibling temp file so a crash never leaves a half-written note behind.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use memchr::memchr;
use tempfile::NamedTempFile;

use crate::error::IoError;

/// Bytes inspected by [`is_binary`].
const BINARY_SNIFF_LEN: usize = 8192;

/// Quick binary detection - checks first 8KB for NULL bytes.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = buffer.len().min(BINARY_SNIFF_LEN);
    memchr(0, &buffer[..check_len]).is_some()
}

/// Read a text document with size, binary and encoding checks.
///
/// Invalid UTF-8 is rejected instead of decoded lossily; callers may write
/// the content back verbatim.
///
/// # Errors
/// `NotFound` when the path is missing, `TooLarge` above `max_bytes`,
/// `BinaryFile` / `Encoding` for non-text content.
pub fn read_text_safe<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, IoError> {
    let path = path.as_ref();

    let metadata =
        fs::metadata(path).map_err(|_| IoError::NotFound(path.to_string_lossy().to_string()))?;

    if metadata.len() > max_bytes {
        return Err(IoError::TooLarge(metadata.len(), max_bytes));
    }

    let mut file = fs::File::open(path)?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or_default());
    file.read_to_end(&mut buffer)?;

    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }
    String::from_utf8(buffer).map_err(|_| IoError::Encoding)
}

/// Replace the content of `path` atomically.
///
/// The new content is written to a temp file in the same directory and then
/// renamed over the target.
///
/// # Errors
/// Returns `IoError::System` if the temp file cannot be created, written or
/// persisted.
pub fn write_text_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<(), IoError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| IoError::System(e.error))?;
    Ok(())
}
