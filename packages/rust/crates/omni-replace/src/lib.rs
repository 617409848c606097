#![allow(clippy::doc_markdown)]

//! omni-replace - Regex Find-and-Replace for Markdown Vaults
//!
//! Scans a set of document snapshots for a regular expression, previews every
//! occurrence with context, and computes new content for the documents a
//! substitution would change.
//!
//! # Features
//!
//! - **Line-indexed preview**: one record per occurrence with offsets and context
//! - **Whole-vault replace**: only changed documents are returned
//! - **Verified single replace**: stale offsets are detected, never applied
//! - **Case adjustment**: `TODO` -> `DONE`, `Todo` -> `Done`
//! - **Chunked runs**: cooperative yielding with progress and cancellation
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-replace/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # ReplaceError enum (thiserror)
//! ├── types.rs     # Document, PatternSpec, MatchRecord, ScanResult, DocumentEdit
//! ├── pattern.rs   # Flags, compile/validate, explicit search cursor
//! ├── template.rs  # `$1` / `$<name>` / `$&` replacement templates
//! ├── case.rs      # Case adjustment heuristic
//! ├── scanner.rs   # Match scanner and context window
//! ├── replacer.rs  # VaultReplacer: apply_all / apply_single
//! ├── batch.rs     # Chunked async runs with progress
//! ├── vault.rs     # DocumentStore load/commit helpers
//! ├── diff.rs      # Unified diff preview
//! └── config.rs    # YAML settings
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_replace::{Document, PatternSpec, VaultReplacer};
//!
//! let docs = vec![Document::new("a.md", "before test after")];
//! let spec = PatternSpec::new("test").with_replacement("x");
//!
//! let preview = VaultReplacer::scan(&docs, &spec);
//! assert_eq!(preview.matches[0].start_offset, 7);
//!
//! let batch = VaultReplacer::apply_all(&docs, &spec);
//! assert_eq!(batch[0].new_content, "before x after");
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod batch;
mod case;
mod config;
mod diff;
mod error;
mod pattern;
mod replacer;
mod scanner;
mod template;
mod types;
mod vault;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use case::adjust_case;
pub use error::ReplaceError;
pub use pattern::{Occurrences, RegexFlags, compile, next_match, validate};
pub use replacer::VaultReplacer;
pub use scanner::{
    ContextWindow, DEFAULT_CONTEXT_LINES, DEFAULT_SNIPPET_LENGTH, Scanner, TRUNCATION_MARKER,
};
pub use template::ReplacementTemplate;
pub use types::{
    DEFAULT_FLAGS, Document, DocumentEdit, MatchRecord, PatternSpec, ReplacementBatch, ScanResult,
};

// Chunked runs
pub use batch::{ChunkConfig, ChunkedOutcome, DEFAULT_CHUNK_SIZE, Progress};

// Store bridging and preview
pub use config::{CONFIG_ENV, ReplaceSettings, SearchSettings, VaultSettings};
pub use diff::{render_batch_diff, render_document_diff};
pub use vault::{LoadedDocuments, commit_batch, load_documents};
