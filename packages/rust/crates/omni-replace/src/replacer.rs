//! Replacement engine and the `VaultReplacer` entry points.
//!
//! Whole-document replacement substitutes every occurrence across the full
//! content; single-occurrence replacement re-verifies a recorded match
//! against the document's current text before splicing.

use omni_io::DocumentStore;
use rayon::prelude::*;

use crate::error::ReplaceError;
use crate::pattern::{CompiledSpec, Occurrences, validate};
use crate::scanner::Scanner;
use crate::types::{Document, DocumentEdit, MatchRecord, PatternSpec, ReplacementBatch, ScanResult};

/// VaultReplacer - regex find-and-replace over document snapshots.
///
/// Stateless: each call compiles its `PatternSpec` and returns fresh values.
///
/// # Example
///
/// ```rust,ignore
/// use omni_replace::{Document, PatternSpec, VaultReplacer};
///
/// let docs = vec![Document::new("a.md", "test test test")];
/// let spec = PatternSpec::new("test").with_replacement("x");
///
/// let preview = VaultReplacer::scan(&docs, &spec);
/// assert_eq!(preview.total_matches, 3);
///
/// let batch = VaultReplacer::apply_all(&docs, &spec);
/// assert_eq!(batch[0].new_content, "x x x");
/// ```
pub struct VaultReplacer;

impl VaultReplacer {
    /// Whether `pattern` compiles with default flags.
    #[must_use]
    pub fn validate(pattern: &str) -> bool {
        validate(pattern)
    }

    /// Report every occurrence of the pattern.
    ///
    /// An empty or invalid pattern yields an empty result, never an error.
    #[must_use]
    pub fn scan(documents: &[Document], spec: &PatternSpec) -> ScanResult {
        Scanner::for_run(spec).map_or_else(ScanResult::default, |scanner| scanner.scan(documents))
    }

    /// New content for every document the substitution changes.
    ///
    /// Unchanged documents are absent from the batch. An empty or invalid
    /// pattern yields an empty batch.
    #[must_use]
    pub fn apply_all(documents: &[Document], spec: &PatternSpec) -> ReplacementBatch {
        CompiledSpec::for_run(spec, "apply_all")
            .map(|compiled| replace_documents(&compiled, documents))
            .unwrap_or_default()
    }

    /// Replace exactly the occurrence described by `record`.
    ///
    /// `document` must hold the current content; offsets are re-verified
    /// against it. With `adjust_case`, the record's replacement is
    /// case-harmonized against its matched text.
    ///
    /// # Errors
    /// `Conflict` when the line is gone or the text at the recorded offsets
    /// differs from `record.matched_text`; `DocumentMismatch` when the
    /// record names another document.
    pub fn apply_single(
        document: &Document,
        record: &MatchRecord,
        adjust_case: bool,
    ) -> Result<String, ReplaceError> {
        if document.path != record.path {
            return Err(ReplaceError::DocumentMismatch {
                expected: record.path.clone(),
                found: document.path.clone(),
            });
        }

        let conflict = |found: &str| ReplaceError::Conflict {
            path: record.path.clone(),
            line: record.line_number,
            expected: record.matched_text.clone(),
            found: found.to_string(),
        };

        let (line_start, line) =
            locate_line(&document.content, record.line_number).ok_or_else(|| conflict(""))?;
        let (start, end) = char_span_to_bytes(line, record.start_offset, record.end_offset)
            .ok_or_else(|| conflict(""))?;

        let current = &line[start..end];
        if current != record.matched_text {
            return Err(conflict(current));
        }

        let replacement = if adjust_case {
            crate::case::adjust_case(&record.matched_text, &record.replacement)
        } else {
            record.replacement.clone()
        };

        let content = &document.content;
        let mut updated = String::with_capacity(content.len() + replacement.len());
        updated.push_str(&content[..line_start + start]);
        updated.push_str(&replacement);
        updated.push_str(&content[line_start + end..]);
        Ok(updated)
    }

    /// Read the record's document from `store`, replace the one occurrence
    /// and write the result back.
    ///
    /// Nothing is written when verification fails.
    ///
    /// # Errors
    /// Store read/write failures, or the `apply_single` conflict errors.
    pub fn replace_one_in_store<S: DocumentStore + ?Sized>(
        store: &mut S,
        record: &MatchRecord,
        adjust_case: bool,
    ) -> Result<String, ReplaceError> {
        let current = Document::new(record.path.clone(), store.read(&record.path)?);
        let updated = Self::apply_single(&current, record, adjust_case)?;
        store.write(&record.path, &updated)?;
        tracing::info!(
            document = %record.path,
            line = record.line_number,
            "replaced single occurrence"
        );
        Ok(updated)
    }
}

/// Substitute across `documents`, keeping only changed ones, in input order.
pub(crate) fn replace_documents(compiled: &CompiledSpec, documents: &[Document]) -> ReplacementBatch {
    let batch: ReplacementBatch = documents
        .par_iter()
        .filter_map(|document| {
            let new_content = replace_content(compiled, &document.content);
            (new_content != document.content).then(|| DocumentEdit {
                path: document.path.clone(),
                new_content,
            })
        })
        .collect();

    tracing::debug!(
        documents = documents.len(),
        changed = batch.len(),
        "replacement pass complete"
    );
    batch
}

/// Substitute every occurrence in `content`.
fn replace_content(compiled: &CompiledSpec, content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for caps in Occurrences::new(&compiled.regex, content) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&content[last..whole.start()]);
        out.push_str(&compiled.replacement_for(&caps));
        last = whole.end();
    }
    out.push_str(&content[last..]);
    out
}

/// Byte offset and text of 1-based line `line_number` (lines split on `\n`).
fn locate_line(content: &str, line_number: usize) -> Option<(usize, &str)> {
    let mut line_start = 0;
    for (index, line) in content.split('\n').enumerate() {
        if index + 1 == line_number {
            return Some((line_start, line));
        }
        line_start += line.len() + 1;
    }
    None
}

/// Convert a character span to a byte span within `line`.
fn char_span_to_bytes(line: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    if end < start {
        return None;
    }
    let mut boundaries = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));
    let start_byte = boundaries.nth(start)?;
    let end_byte = if end == start {
        start_byte
    } else {
        boundaries.nth(end - start - 1)?
    };
    Some((start_byte, end_byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_line() {
        let content = "zero\none\n\nthree";
        assert_eq!(locate_line(content, 1), Some((0, "zero")));
        assert_eq!(locate_line(content, 2), Some((5, "one")));
        assert_eq!(locate_line(content, 3), Some((9, "")));
        assert_eq!(locate_line(content, 4), Some((10, "three")));
        assert_eq!(locate_line(content, 5), None);
        assert_eq!(locate_line(content, 0), None);
    }

    #[test]
    fn test_char_span_to_bytes() {
        assert_eq!(char_span_to_bytes("abc", 1, 2), Some((1, 2)));
        assert_eq!(char_span_to_bytes("héllo", 1, 2), Some((1, 3)));
        assert_eq!(char_span_to_bytes("abc", 3, 3), Some((3, 3)));
        assert_eq!(char_span_to_bytes("abc", 2, 5), None);
        assert_eq!(char_span_to_bytes("abc", 2, 1), None);
    }

    #[test]
    fn test_zero_width_replacement_prefixes_lines() {
        let spec = PatternSpec::new("^").with_flags("gm").with_replacement("> ");
        let compiled = CompiledSpec::new(&spec).unwrap();
        assert_eq!(replace_content(&compiled, "a\nb"), "> a\n> b");
    }

    #[test]
    fn test_empty_match_after_non_empty_match() {
        let spec = PatternSpec::new("a*").with_replacement("X");
        let compiled = CompiledSpec::new(&spec).unwrap();
        assert_eq!(replace_content(&compiled, "ab"), "XXbX");
    }
}
