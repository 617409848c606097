//! Tests for scanner module - match preview records and ordering.

use omni_replace::{
    ContextWindow, Document, PatternSpec, ReplaceSettings, Scanner, TRUNCATION_MARKER,
    VaultReplacer,
};

fn docs(items: &[(&str, &str)]) -> Vec<Document> {
    items
        .iter()
        .map(|(path, content)| Document::new(*path, *content))
        .collect()
}

#[test]
fn test_scan_counts_every_occurrence() {
    let documents = docs(&[("a.md", "test test test")]);
    let spec = PatternSpec::new("test").with_replacement("x");

    let result = VaultReplacer::scan(&documents, &spec);

    assert_eq!(result.total_matches, 3);
    assert_eq!(result.affected_documents, vec!["a.md"]);
    let starts: Vec<usize> = result.matches.iter().map(|m| m.start_offset).collect();
    assert_eq!(starts, vec![0, 5, 10]);
    assert!(result.matches.iter().all(|m| m.replacement == "x"));
}

#[test]
fn test_scan_records_before_after_and_offsets() {
    let documents = docs(&[("a.md", "before test after")]);
    let result = VaultReplacer::scan(&documents, &PatternSpec::new("test"));

    assert_eq!(result.matches.len(), 1);
    let record = &result.matches[0];
    assert_eq!(record.line_number, 1);
    assert_eq!(record.before, "before ");
    assert_eq!(record.after, " after");
    assert_eq!(record.start_offset, 7);
    assert_eq!(record.end_offset, 11);
    // No template: the preview echoes the match.
    assert_eq!(record.replacement, "test");
}

#[test]
fn test_scan_without_occurrences_is_empty() {
    let documents = docs(&[("a.md", "nothing here"), ("b.md", "or here")]);
    let result = VaultReplacer::scan(&documents, &PatternSpec::new("test"));

    assert!(result.is_empty());
    assert!(result.affected_documents.is_empty());
    assert_eq!(result.summary(), "No results");
}

#[test]
fn test_scan_empty_and_invalid_patterns_yield_nothing() {
    let documents = docs(&[("a.md", "anything at all")]);

    assert!(VaultReplacer::scan(&documents, &PatternSpec::new("")).is_empty());
    assert!(VaultReplacer::scan(&documents, &PatternSpec::new("(test")).is_empty());
    assert!(VaultReplacer::scan(&documents, &PatternSpec::new("a").with_flags("gz")).is_empty());
}

#[test]
fn test_scan_orders_by_document_line_then_column() {
    let documents = docs(&[
        ("b.md", "x\nx x"),
        ("a.md", "no\nno\nx"),
        ("c.md", "none"),
    ]);
    let result = VaultReplacer::scan(&documents, &PatternSpec::new("x"));

    let order: Vec<(&str, usize, usize)> = result
        .matches
        .iter()
        .map(|m| (m.path.as_str(), m.line_number, m.start_offset))
        .collect();
    assert_eq!(
        order,
        vec![("b.md", 1, 0), ("b.md", 2, 0), ("b.md", 2, 2), ("a.md", 3, 0)]
    );
    assert_eq!(result.affected_documents, vec!["b.md", "a.md"]);
    assert_eq!(result.summary(), "4 results in 2 files");
}

#[test]
fn test_scan_case_insensitive_flag() {
    let documents = docs(&[("a.md", "Test TEST test")]);

    let sensitive = VaultReplacer::scan(&documents, &PatternSpec::new("test"));
    assert_eq!(sensitive.total_matches, 1);

    let insensitive = VaultReplacer::scan(&documents, &PatternSpec::new("test").with_flags("gi"));
    assert_eq!(insensitive.total_matches, 3);
}

#[test]
fn test_scan_zero_width_anchor_once_per_line() {
    let documents = docs(&[("a.md", "one\ntwo\nthree")]);
    let spec = PatternSpec::new("^").with_flags("gm").with_replacement("> ");

    let result = VaultReplacer::scan(&documents, &spec);

    assert_eq!(result.total_matches, 3);
    for (index, record) in result.matches.iter().enumerate() {
        assert_eq!(record.line_number, index + 1);
        assert_eq!(record.start_offset, 0);
        assert_eq!(record.end_offset, 0);
        assert_eq!(record.replacement, "> ");
    }
}

#[test]
fn test_scan_context_is_clipped_window() {
    let content = "l1\nl2\nl3\nl4 hit\nl5\nl6\nl7";
    let documents = docs(&[("a.md", content)]);
    let result = VaultReplacer::scan(&documents, &PatternSpec::new("hit"));

    assert_eq!(result.matches[0].context, "l2\nl3\nl4 hit\nl5\nl6");

    let first_line = docs(&[("a.md", "hit\nl2\nl3\nl4")]);
    let result = VaultReplacer::scan(&first_line, &PatternSpec::new("hit"));
    assert_eq!(result.matches[0].context, "hit\nl2\nl3");
}

#[test]
fn test_scan_truncates_long_context_lines() {
    let long = format!("{} hit", "a".repeat(300));
    let documents = docs(&[("a.md", long.as_str())]);
    let result = VaultReplacer::scan(&documents, &PatternSpec::new("hit"));

    let context = &result.matches[0].context;
    assert_eq!(context.chars().count(), 200 + TRUNCATION_MARKER.len());
    assert!(context.ends_with(TRUNCATION_MARKER));
    // The record itself keeps the full line.
    assert_eq!(result.matches[0].before.len(), 301);
}

#[test]
fn test_scan_offsets_count_characters() {
    let documents = docs(&[("a.md", "héllo wörld")]);
    let result = VaultReplacer::scan(&documents, &PatternSpec::new("wörld"));

    let record = &result.matches[0];
    assert_eq!(record.start_offset, 6);
    assert_eq!(record.end_offset, 11);
}

#[test]
fn test_scan_expands_capture_groups() {
    let documents = docs(&[("a.md", "hello world")]);
    let spec = PatternSpec::new(r"(\w+) (\w+)").with_replacement("$2 $1");

    let result = VaultReplacer::scan(&documents, &spec);
    assert_eq!(result.matches[0].replacement, "world hello");
}

#[test]
fn test_scanner_custom_window() {
    let documents = docs(&[("a.md", "a\nb\nc hit\nd\ne")]);
    let scanner = Scanner::new(&PatternSpec::new("hit"))
        .expect("Compile scanner")
        .with_window(ContextWindow {
            lines: 0,
            snippet_length: 3,
        });

    let result = scanner.scan(&documents);
    assert_eq!(result.matches[0].context, "c h...");
}

#[test]
fn test_scanner_rejects_empty_pattern() {
    assert!(Scanner::new(&PatternSpec::new("")).is_err());
}

#[test]
fn test_scan_adjusts_case_per_occurrence() {
    let documents = docs(&[("a.md", "TODO todo Todo")]);
    let spec = PatternSpec::new("todo")
        .with_flags("gi")
        .with_replacement("done")
        .with_adjust_case(true);

    let result = VaultReplacer::scan(&documents, &spec);

    let replacements: Vec<&str> = result.matches.iter().map(|m| m.replacement.as_str()).collect();
    assert_eq!(replacements, vec!["DONE", "done", "Done"]);
}

#[test]
fn test_scan_with_huge_context_from_settings() {
    let settings =
        ReplaceSettings::from_yaml_str("search:\n  context_lines: 18446744073709551615\n")
            .expect("Parse settings");
    let documents = docs(&[("a.md", "x\na\ny")]);
    let scanner = Scanner::new(&PatternSpec::new("a"))
        .expect("Compile scanner")
        .with_window(settings.search.chunk_config().window);

    let result = scanner.scan(&documents);
    assert_eq!(result.matches[0].context, "x\na\ny");
}

#[test]
fn test_scan_lookbehind_pattern() {
    let documents = docs(&[("a.md", "#tag and tag")]);
    let spec = PatternSpec::new("(?<=#)tag").with_replacement("topic");

    let result = VaultReplacer::scan(&documents, &spec);

    assert_eq!(result.total_matches, 1);
    assert_eq!(result.matches[0].start_offset, 1);
    assert_eq!(result.matches[0].before, "#");
    assert_eq!(
        VaultReplacer::apply_all(&documents, &spec)[0].new_content,
        "#topic and tag"
    );
}
