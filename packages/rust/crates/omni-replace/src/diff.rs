//! Diff preview for replacement batches.
//!
//! Renders what a batch would change, document by document, as unified
//! diffs using the `similar` crate.

use std::collections::HashMap;

use similar::TextDiff;

use crate::types::{Document, DocumentEdit};

/// Lines of unchanged context around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// Unified diff of one document edit.
#[must_use]
pub fn render_document_diff(path: &str, original: &str, modified: &str) -> String {
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}

/// Unified diffs for every edit in `batch`, in batch order.
///
/// Edits whose document is not in `documents` are rendered against empty
/// content.
#[must_use]
pub fn render_batch_diff(documents: &[Document], batch: &[DocumentEdit]) -> String {
    let originals: HashMap<&str, &str> = documents
        .iter()
        .map(|doc| (doc.path.as_str(), doc.content.as_str()))
        .collect();

    batch
        .iter()
        .map(|edit| {
            let original = originals.get(edit.path.as_str()).copied().unwrap_or_default();
            render_document_diff(&edit.path, original, &edit.new_content)
        })
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_diff_marks_changed_line() {
        let diff = render_document_diff("a.md", "line1\nold\nline3\n", "line1\nnew\nline3\n");
        assert!(diff.starts_with("--- a/a.md\n+++ b/a.md\n"));
        assert!(diff.contains("-old\n"));
        assert!(diff.contains("+new\n"));
        assert!(diff.contains(" line1\n"));
    }

    #[test]
    fn test_batch_diff_follows_batch_order() {
        let docs = vec![Document::new("a.md", "x\n"), Document::new("b.md", "y\n")];
        let batch = vec![
            DocumentEdit {
                path: "b.md".to_string(),
                new_content: "Y\n".to_string(),
            },
            DocumentEdit {
                path: "a.md".to_string(),
                new_content: "X\n".to_string(),
            },
        ];
        let diff = render_batch_diff(&docs, &batch);
        let b_pos = diff.find("b/b.md").unwrap();
        let a_pos = diff.find("b/a.md").unwrap();
        assert!(b_pos < a_pos);
    }

    #[test]
    fn test_empty_batch_renders_nothing() {
        assert!(render_batch_diff(&[], &[]).is_empty());
    }
}
