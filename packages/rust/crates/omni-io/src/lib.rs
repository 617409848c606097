#![allow(clippy::doc_markdown)]

//! omni-io - Document storage for Omni Replace
//!
//! The storage collaborator of the find-and-replace engine: it lists, reads
//! and writes vault documents so the engine itself can stay pure.
//!
//! # Features
//!
//! - **Store trait**: `DocumentStore` with in-memory and on-disk backends
//! - **Safety**: Binary detection, size limits, strict UTF-8, root confinement
//! - **Atomic writes**: temp file + rename per document
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-io/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # IoError enum
//! ├── sync.rs      # Guarded reads, atomic writes
//! ├── discover.rs  # Vault document discovery (walkdir)
//! └── store.rs     # DocumentStore trait, MemoryStore, VaultStore
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_io::{DiscoverOptions, DocumentStore, VaultStore};
//!
//! let store = VaultStore::new("/path/to/vault", DiscoverOptions::default());
//! for id in store.list_documents()? {
//!     let content = store.read(&id)?;
//! }
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod discover;
mod error;
mod store;
mod sync;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use discover::{DiscoverOptions, discover_documents};
pub use error::IoError;
pub use store::{BatchWriteReport, DocumentStore, MemoryStore, VaultStore};
pub use sync::{is_binary, read_text_safe, write_text_atomic};
