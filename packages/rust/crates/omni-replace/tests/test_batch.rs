//! Tests for batch module - chunked runs with progress and cancellation.

use std::ops::ControlFlow;

use omni_replace::{ChunkConfig, Document, PatternSpec, Progress, VaultReplacer};

fn vault(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| Document::new(format!("note-{i:03}.md"), format!("TODO item {i}")))
        .collect()
}

#[tokio::test]
async fn test_scan_chunked_reports_progress_per_chunk() {
    let documents = vault(60);
    let spec = PatternSpec::new("TODO");
    let mut seen: Vec<Progress> = Vec::new();

    let outcome = VaultReplacer::scan_chunked(&documents, &spec, &ChunkConfig::default(), |p| {
        seen.push(p.clone());
        ControlFlow::Continue(())
    })
    .await;

    assert!(!outcome.cancelled);
    assert_eq!(outcome.processed, 60);
    assert_eq!(outcome.output.total_matches, 60);

    let currents: Vec<usize> = seen.iter().map(|p| p.current).collect();
    assert_eq!(currents, vec![25, 50, 60]);
    assert!(seen.iter().all(|p| p.total == 60));
    assert_eq!(seen[2].message, "Scanned 60 of 60 files");
}

#[tokio::test]
async fn test_chunked_scan_matches_direct_scan() {
    let documents = vault(40);
    let spec = PatternSpec::new(r"item \d+").with_replacement("entry");
    let config = ChunkConfig {
        chunk_size: 7,
        ..ChunkConfig::default()
    };

    let outcome =
        VaultReplacer::scan_chunked(&documents, &spec, &config, |_| ControlFlow::Continue(())).await;

    assert_eq!(outcome.output, VaultReplacer::scan(&documents, &spec));
}

#[tokio::test]
async fn test_apply_all_chunked_cancels_after_first_chunk() {
    let documents = vault(60);
    let spec = PatternSpec::new("TODO").with_replacement("DONE");

    let outcome = VaultReplacer::apply_all_chunked(&documents, &spec, &ChunkConfig::default(), |_| {
        ControlFlow::Break(())
    })
    .await;

    assert!(outcome.cancelled);
    assert_eq!(outcome.processed, 25);
    assert_eq!(outcome.output.len(), 25);
    assert_eq!(outcome.output[0].new_content, "DONE item 0");
}

#[tokio::test]
async fn test_chunked_runs_with_invalid_pattern() {
    let documents = vault(3);
    let mut calls = 0;

    let outcome = VaultReplacer::apply_all_chunked(
        &documents,
        &PatternSpec::new("(").with_replacement("x"),
        &ChunkConfig::default(),
        |_| {
            calls += 1;
            ControlFlow::Continue(())
        },
    )
    .await;

    assert!(outcome.output.is_empty());
    assert_eq!(outcome.processed, 0);
    assert_eq!(calls, 0);
}
