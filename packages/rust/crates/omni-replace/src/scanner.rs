//! Match scanner.
//!
//! Scans documents line by line and reports every occurrence with its
//! position, surrounding context and computed replacement.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::error::ReplaceError;
use crate::pattern::{CompiledSpec, Occurrences};
use crate::types::{Document, MatchRecord, PatternSpec, ScanResult};

/// Lines shown on each side of a match.
pub const DEFAULT_CONTEXT_LINES: usize = 2;
/// Characters kept per context line before truncation.
pub const DEFAULT_SNIPPET_LENGTH: usize = 200;
/// Appended to a truncated context line.
pub const TRUNCATION_MARKER: &str = "...";

/// Shape of the context block attached to each match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    /// Lines before and after the match line.
    pub lines: usize,
    /// Maximum characters per line.
    pub snippet_length: usize,
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self {
            lines: DEFAULT_CONTEXT_LINES,
            snippet_length: DEFAULT_SNIPPET_LENGTH,
        }
    }
}

impl ContextWindow {
    /// Context block around `lines[index]`, clipped to the document.
    #[must_use]
    pub fn render(&self, lines: &[&str], index: usize) -> String {
        let start = index.saturating_sub(self.lines);
        let end = index.saturating_add(self.lines).min(lines.len().saturating_sub(1));
        lines
            .get(start..=end)
            .unwrap_or_default()
            .iter()
            .map(|line| self.truncate(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn truncate(&self, line: &str) -> String {
        match line.char_indices().nth(self.snippet_length) {
            Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &line[..cut]),
            None => line.to_string(),
        }
    }
}

/// A compiled scan, reusable across document chunks.
#[derive(Debug, Clone)]
pub struct Scanner {
    compiled: CompiledSpec,
    window: ContextWindow,
}

impl Scanner {
    /// Compile `spec` for scanning.
    ///
    /// # Errors
    /// `EmptyPattern`, `InvalidFlag` or `Pattern` when there is nothing
    /// runnable to scan with.
    pub fn new(spec: &PatternSpec) -> Result<Self, ReplaceError> {
        Ok(Self {
            compiled: CompiledSpec::new(spec)?,
            window: ContextWindow::default(),
        })
    }

    pub(crate) fn for_run(spec: &PatternSpec) -> Option<Self> {
        CompiledSpec::for_run(spec, "scan").map(|compiled| Self {
            compiled,
            window: ContextWindow::default(),
        })
    }

    /// Use a custom context window.
    #[must_use]
    pub fn with_window(mut self, window: ContextWindow) -> Self {
        self.window = window;
        self
    }

    /// Scan documents; output follows input order.
    #[must_use]
    pub fn scan(&self, documents: &[Document]) -> ScanResult {
        let per_document: Vec<Vec<MatchRecord>> = documents
            .par_iter()
            .map(|document| self.scan_document(document))
            .collect();

        let mut result = ScanResult::default();
        let mut seen: HashSet<&str> = HashSet::new();
        for (document, records) in documents.iter().zip(per_document) {
            if records.is_empty() {
                continue;
            }
            if seen.insert(document.path.as_str()) {
                result.affected_documents.push(document.path.clone());
            }
            result.total_matches += records.len();
            result.matches.extend(records);
        }

        tracing::debug!(
            documents = documents.len(),
            affected = result.affected_documents.len(),
            matches = result.total_matches,
            "scan complete"
        );
        result
    }

    /// Every occurrence in one document, in line then column order.
    #[must_use]
    pub fn scan_document(&self, document: &Document) -> Vec<MatchRecord> {
        let lines: Vec<&str> = document.content.split('\n').collect();
        let mut records = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let mut context: Option<String> = None;

            for caps in Occurrences::new(&self.compiled.regex, line) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let matched = whole.as_str();
                let start_offset = line[..whole.start()].chars().count();
                let end_offset = start_offset + matched.chars().count();

                let replacement = if self.compiled.template.is_empty() {
                    matched.to_string()
                } else {
                    self.compiled.replacement_for(&caps)
                };

                let context = context
                    .get_or_insert_with(|| self.window.render(&lines, index))
                    .clone();

                records.push(MatchRecord {
                    path: document.path.clone(),
                    line_number: index + 1,
                    matched_text: matched.to_string(),
                    replacement,
                    context,
                    before: line[..whole.start()].to_string(),
                    after: line[whole.end()..].to_string(),
                    start_offset,
                    end_offset,
                });
            }
        }

        records
    }
}
