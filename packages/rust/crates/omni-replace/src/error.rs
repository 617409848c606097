//! Error types for find-and-replace operations.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use omni_io::IoError;
use thiserror::Error;

/// Error types for find-and-replace operations.
///
/// `scan` and `apply_all` never surface `Pattern`, `InvalidFlag` or
/// `EmptyPattern`; they degrade to empty results. Those variants are only
/// returned by the explicit compile step.
#[derive(Error, Debug)]
pub enum ReplaceError {
    /// Regular expression failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Unknown character in the flag string.
    #[error("Invalid regex flag: '{0}'")]
    InvalidFlag(char),

    /// No search is active (empty pattern).
    #[error("Empty search pattern")]
    EmptyPattern,

    /// The document changed since the match was recorded.
    #[error("Conflict in {path} at line {line}: expected {expected:?}, found {found:?}")]
    Conflict {
        /// Document identity.
        path: String,
        /// 1-based line number from the match record.
        line: usize,
        /// Text the match record expects at its offsets.
        expected: String,
        /// Text currently at those offsets (empty if the line is gone).
        found: String,
    },

    /// A match record was applied to a different document.
    #[error("Match record belongs to {expected}, not {found}")]
    DocumentMismatch {
        /// Path stored in the match record.
        expected: String,
        /// Path of the document supplied.
        found: String,
    },

    /// Settings file could not be read or is invalid.
    #[error("Config error: {0}")]
    Config(String),

    /// Storage error from the document store.
    #[error("IO error: {0}")]
    Io(#[from] IoError),
}
