//! Core types for find-and-replace.
//!
//! Every value here is created fresh per scan or replace call; nothing is
//! cached between calls.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default flag string (global search).
pub const DEFAULT_FLAGS: &str = "g";

/// A document snapshot handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identity (vault-relative path).
    pub path: String,
    /// Full text content.
    pub content: String,
}

impl Document {
    /// Create a document snapshot.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Pattern, flags and replacement for one scan or replace call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Regular expression source.
    pub pattern: String,
    /// Flag string such as `"gi"`.
    pub flags: String,
    /// Replacement template (`$1`, `$<name>`, `$&`, `$$`).
    pub replacement: String,
    /// Reproduce the casing of each matched text in its replacement.
    pub adjust_case: bool,
}

impl PatternSpec {
    /// Search-only spec with default flags.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            flags: DEFAULT_FLAGS.to_string(),
            replacement: String::new(),
            adjust_case: false,
        }
    }

    /// Set the flag string.
    #[must_use]
    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    /// Set the replacement template.
    #[must_use]
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = replacement.into();
        self
    }

    /// Enable or disable case adjustment.
    #[must_use]
    pub fn with_adjust_case(mut self, adjust_case: bool) -> Self {
        self.adjust_case = adjust_case;
        self
    }
}

/// One occurrence of the pattern.
///
/// Offsets count characters (Unicode scalar values) from the start of the
/// line, so `start_offset + matched_text.chars().count() == end_offset` and
/// `before + matched_text + after` is the full line at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Document identity.
    pub path: String,
    /// Line number (1-indexed).
    pub line_number: usize,
    /// Matched text.
    pub matched_text: String,
    /// Computed replacement for this occurrence.
    pub replacement: String,
    /// Surrounding lines joined with `\n`, each truncated.
    pub context: String,
    /// Text on the line before the match.
    pub before: String,
    /// Text on the line after the match.
    pub after: String,
    /// Start offset within the line (characters).
    pub start_offset: usize,
    /// End offset within the line (characters, exclusive).
    pub end_offset: usize,
}

/// Result of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Records in document, line, then column order.
    pub matches: Vec<MatchRecord>,
    /// Documents with at least one match, in document order.
    pub affected_documents: Vec<String>,
    /// Number of records.
    pub total_matches: usize,
}

impl ScanResult {
    /// True when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }

    /// Append another result, keeping order and document uniqueness.
    pub fn merge(&mut self, other: ScanResult) {
        let mut seen: HashSet<String> = self.affected_documents.iter().cloned().collect();
        for path in other.affected_documents {
            if seen.insert(path.clone()) {
                self.affected_documents.push(path);
            }
        }
        self.total_matches += other.total_matches;
        self.matches.extend(other.matches);
    }

    /// Matches grouped per document, in scan order.
    #[must_use]
    pub fn grouped_by_document(&self) -> Vec<(&str, Vec<&MatchRecord>)> {
        let mut groups: Vec<(&str, Vec<&MatchRecord>)> = Vec::new();
        for record in &self.matches {
            let same_document = groups
                .last()
                .is_some_and(|(path, _)| *path == record.path);
            if same_document && let Some((_, records)) = groups.last_mut() {
                records.push(record);
            } else {
                groups.push((record.path.as_str(), vec![record]));
            }
        }
        groups
    }

    /// One-line status such as `"3 results in 2 files"`.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_matches == 0 {
            return f.write_str("No results");
        }
        let files = self.affected_documents.len();
        write!(
            f,
            "{} results in {} file{}",
            self.total_matches,
            files,
            if files == 1 { "" } else { "s" }
        )
    }
}

/// New content for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEdit {
    /// Document identity.
    pub path: String,
    /// Full post-substitution content.
    pub new_content: String,
}

/// Edits for every document whose content changed, in document order.
pub type ReplacementBatch = Vec<DocumentEdit>;
