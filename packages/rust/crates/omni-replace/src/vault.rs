//! Bridging a `DocumentStore` and the engine.
//!
//! Loading turns stored documents into snapshots; committing writes a
//! replacement batch back. Both are per-document: one failure never hides
//! the other documents.

use omni_io::{BatchWriteReport, DocumentStore, IoError};

use crate::error::ReplaceError;
use crate::types::{Document, ReplacementBatch};

/// Snapshots read from a store.
#[derive(Debug, Default)]
pub struct LoadedDocuments {
    /// Documents read successfully, in listing order.
    pub documents: Vec<Document>,
    /// Documents that could not be read.
    pub failures: Vec<(String, IoError)>,
}

/// Read every listed document.
///
/// # Errors
/// Only a failure to list the store; unreadable documents land in
/// `LoadedDocuments::failures`.
pub fn load_documents<S: DocumentStore + ?Sized>(store: &S) -> Result<LoadedDocuments, ReplaceError> {
    let mut loaded = LoadedDocuments::default();
    for id in store.list_documents()? {
        match store.read(&id) {
            Ok(content) => loaded.documents.push(Document::new(id, content)),
            Err(err) => {
                tracing::warn!(document = %id, error = %err, "skipping unreadable document");
                loaded.failures.push((id, err));
            }
        }
    }
    tracing::debug!(
        loaded = loaded.documents.len(),
        failed = loaded.failures.len(),
        "documents loaded"
    );
    Ok(loaded)
}

/// Write a replacement batch through `store`, in batch order.
pub fn commit_batch<S: DocumentStore + ?Sized>(store: &mut S, batch: &ReplacementBatch) -> BatchWriteReport {
    let writes: Vec<(String, String)> = batch
        .iter()
        .map(|edit| (edit.path.clone(), edit.new_content.clone()))
        .collect();
    let report = store.write_batch(&writes);
    tracing::info!(
        written = report.written.len(),
        failed = report.failed.len(),
        "replacement batch committed"
    );
    report
}
