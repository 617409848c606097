//! Document storage collaborator.
//!
//! The find-and-replace core never touches storage itself; callers list and
//! read documents through a [`DocumentStore`] and persist the results back
//! through it. Any backend works: the real vault on disk, an in-memory map in
//! tests, or a versioned store.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::discover::{DiscoverOptions, discover_documents};
use crate::error::IoError;
use crate::sync::{read_text_safe, write_text_atomic};

/// Storage operations consumed by find-and-replace callers.
pub trait DocumentStore {
    /// List every document identity, in a stable order.
    ///
    /// # Errors
    /// Backend-specific listing failure.
    fn list_documents(&self) -> Result<Vec<String>, IoError>;

    /// Read the current content of one document.
    ///
    /// # Errors
    /// Backend-specific read failure for this document.
    fn read(&self, id: &str) -> Result<String, IoError>;

    /// Replace the content of one document.
    ///
    /// # Errors
    /// Backend-specific write failure for this document.
    fn write(&mut self, id: &str, content: &str) -> Result<(), IoError>;

    /// Apply `writes` in order.
    ///
    /// A later write to the same identity overrides an earlier one. Failures
    /// are collected per document and never abort the remaining writes.
    fn write_batch(&mut self, writes: &[(String, String)]) -> BatchWriteReport {
        let mut report = BatchWriteReport::default();
        for (id, content) in writes {
            match self.write(id, content) {
                Ok(()) => report.written.push(id.clone()),
                Err(err) => {
                    tracing::warn!(document = %id, error = %err, "document write failed");
                    report.failed.push((id.clone(), err));
                }
            }
        }
        report
    }
}

/// Outcome of [`DocumentStore::write_batch`].
#[derive(Debug, Default)]
pub struct BatchWriteReport {
    /// Identities written successfully, in write order.
    pub written: Vec<String>,
    /// Identities that failed, with the reason.
    pub failed: Vec<(String, IoError)>,
}

impl BatchWriteReport {
    /// True when every write succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// In-memory store, ordered by identity.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document, returning `self` for chaining.
    #[must_use]
    pub fn with_document(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
        self.documents.insert(id.into(), content.into());
        self
    }

    /// Borrow a document's content.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.documents.get(id).map(String::as_str)
    }
}

impl DocumentStore for MemoryStore {
    fn list_documents(&self) -> Result<Vec<String>, IoError> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn read(&self, id: &str) -> Result<String, IoError> {
        self.documents
            .get(id)
            .cloned()
            .ok_or_else(|| IoError::NotFound(id.to_string()))
    }

    fn write(&mut self, id: &str, content: &str) -> Result<(), IoError> {
        self.documents.insert(id.to_string(), content.to_string());
        Ok(())
    }
}

/// Directory-backed vault store.
///
/// Identities are `/`-separated paths relative to the vault root.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
    options: DiscoverOptions,
}

impl VaultStore {
    /// Open a vault rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, options: DiscoverOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an identity to a path inside the root.
    fn resolve(&self, id: &str) -> Result<PathBuf, IoError> {
        let rel = Path::new(id);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if id.is_empty() || escapes {
            return Err(IoError::InvalidPath(id.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

impl DocumentStore for VaultStore {
    fn list_documents(&self) -> Result<Vec<String>, IoError> {
        if !self.root.is_dir() {
            return Err(IoError::NotFound(self.root.display().to_string()));
        }
        Ok(discover_documents(&self.root, &self.options))
    }

    fn read(&self, id: &str) -> Result<String, IoError> {
        let path = self.resolve(id)?;
        read_text_safe(path, self.options.max_file_size)
    }

    fn write(&mut self, id: &str, content: &str) -> Result<(), IoError> {
        let path = self.resolve(id)?;
        if !path.is_file() {
            return Err(IoError::NotFound(id.to_string()));
        }
        write_text_atomic(&path, content)
    }
}
