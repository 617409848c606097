//! Error types for document storage operations.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for document I/O.
///
/// Each variant represents a specific failure mode of a single document;
/// stores never fail a whole batch because of one of these.
#[derive(Error, Debug)]
pub enum IoError {
    /// Document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Document exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// Document contains binary content (NULL bytes detected).
    #[error("Binary file detected")]
    BinaryFile,

    /// Document identity is absolute or escapes the store root.
    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    /// Content is not valid UTF-8.
    #[error("UTF-8 decoding error")]
    Encoding,

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),
}
