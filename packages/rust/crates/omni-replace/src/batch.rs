//! Chunked processing with progress reporting.
//!
//! Large vaults are processed in fixed-size chunks. Between chunks the task
//! yields to the tokio scheduler and reports progress; the progress callback
//! may return `ControlFlow::Break` to stop before the next chunk.

use std::ops::ControlFlow;

use serde::Serialize;

use crate::VaultReplacer;
use crate::pattern::CompiledSpec;
use crate::replacer::replace_documents;
use crate::scanner::{ContextWindow, Scanner};
use crate::types::{Document, PatternSpec, ReplacementBatch, ScanResult};

/// Documents per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 25;

/// Progress after a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Documents processed so far.
    pub current: usize,
    /// Documents in the run.
    pub total: usize,
    /// Human-readable status.
    pub message: String,
}

/// Configuration for chunked runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Documents per chunk (0 is treated as 1).
    pub chunk_size: usize,
    /// Context block shape for scans.
    pub window: ContextWindow,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            window: ContextWindow::default(),
        }
    }
}

/// Output of a chunked run.
#[derive(Debug, Clone, Default)]
pub struct ChunkedOutcome<T> {
    /// Accumulated output of the completed chunks.
    pub output: T,
    /// Documents processed.
    pub processed: usize,
    /// True when the callback stopped the run early.
    pub cancelled: bool,
}

impl VaultReplacer {
    /// [`VaultReplacer::scan`] in chunks, yielding between them.
    pub async fn scan_chunked<F>(
        documents: &[Document],
        spec: &PatternSpec,
        config: &ChunkConfig,
        on_progress: F,
    ) -> ChunkedOutcome<ScanResult>
    where
        F: FnMut(&Progress) -> ControlFlow<()>,
    {
        let Some(scanner) = Scanner::for_run(spec) else {
            return ChunkedOutcome::default();
        };
        let scanner = scanner.with_window(config.window);

        run_chunks(documents, config.chunk_size, "Scanned", on_progress, |chunk, acc: &mut ScanResult| {
            acc.merge(scanner.scan(chunk));
        })
        .await
    }

    /// [`VaultReplacer::apply_all`] in chunks, yielding between them.
    pub async fn apply_all_chunked<F>(
        documents: &[Document],
        spec: &PatternSpec,
        config: &ChunkConfig,
        on_progress: F,
    ) -> ChunkedOutcome<ReplacementBatch>
    where
        F: FnMut(&Progress) -> ControlFlow<()>,
    {
        let Some(compiled) = CompiledSpec::for_run(spec, "apply_all") else {
            return ChunkedOutcome::default();
        };

        run_chunks(
            documents,
            config.chunk_size,
            "Prepared",
            on_progress,
            |chunk, acc: &mut ReplacementBatch| {
                acc.extend(replace_documents(&compiled, chunk));
            },
        )
        .await
    }
}

async fn run_chunks<T, F, W>(
    documents: &[Document],
    chunk_size: usize,
    verb: &str,
    mut on_progress: F,
    mut work: W,
) -> ChunkedOutcome<T>
where
    T: Default,
    F: FnMut(&Progress) -> ControlFlow<()>,
    W: FnMut(&[Document], &mut T),
{
    let total = documents.len();
    let mut outcome = ChunkedOutcome::<T>::default();

    for chunk in documents.chunks(chunk_size.max(1)) {
        work(chunk, &mut outcome.output);
        outcome.processed += chunk.len();

        let progress = Progress {
            current: outcome.processed,
            total,
            message: format!("{verb} {} of {total} files", outcome.processed),
        };
        tracing::debug!(current = progress.current, total, "chunk complete");

        if on_progress(&progress).is_break() {
            outcome.cancelled = outcome.processed < total;
            break;
        }
        tokio::task::yield_now().await;
    }

    outcome
}
