//! Tests for store module - vault-backed and in-memory document stores.

use std::fs;
use tempfile::TempDir;

use omni_io::{DiscoverOptions, DocumentStore, IoError, MemoryStore, VaultStore};

fn vault() -> TempDir {
    let dir = TempDir::new().expect("Create temp dir");
    fs::create_dir_all(dir.path().join("projects")).expect("Create subdir");
    fs::create_dir_all(dir.path().join(".obsidian")).expect("Create config dir");
    fs::write(dir.path().join("inbox.md"), "TODO: call\n").expect("Write inbox");
    fs::write(dir.path().join("projects/alpha.md"), "alpha TODO\n").expect("Write alpha");
    fs::write(dir.path().join(".obsidian/app.json"), "{}").expect("Write config");
    dir
}

#[test]
fn test_vault_lists_markdown_only() {
    let dir = vault();
    let store = VaultStore::new(dir.path(), DiscoverOptions::default());

    let ids = store.list_documents().expect("List documents");
    assert_eq!(ids, vec!["inbox.md", "projects/alpha.md"]);
}

#[test]
fn test_vault_read_write_roundtrip() {
    let dir = vault();
    let mut store = VaultStore::new(dir.path(), DiscoverOptions::default());

    store
        .write("projects/alpha.md", "alpha DONE\n")
        .expect("Write document");
    assert_eq!(
        store.read("projects/alpha.md").expect("Read document"),
        "alpha DONE\n"
    );
}

#[test]
fn test_vault_write_does_not_create_documents() {
    let dir = vault();
    let mut store = VaultStore::new(dir.path(), DiscoverOptions::default());

    let result = store.write("new.md", "content");
    assert!(matches!(result, Err(IoError::NotFound(_))));
    assert!(!dir.path().join("new.md").exists());
}

#[test]
fn test_vault_batch_collects_failures() {
    let dir = vault();
    let mut store = VaultStore::new(dir.path(), DiscoverOptions::default());

    let report = store.write_batch(&[
        ("inbox.md".to_string(), "DONE: call\n".to_string()),
        ("../outside.md".to_string(), "nope".to_string()),
        ("projects/alpha.md".to_string(), "alpha DONE\n".to_string()),
    ]);

    assert_eq!(report.written, vec!["inbox.md", "projects/alpha.md"]);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(report.failed[0].1, IoError::InvalidPath(_)));
    assert_eq!(
        fs::read_to_string(dir.path().join("inbox.md")).expect("Read inbox"),
        "DONE: call\n"
    );
}

#[test]
fn test_missing_vault_root_is_an_error() {
    let store = VaultStore::new("/nonexistent/vault", DiscoverOptions::default());
    assert!(store.list_documents().is_err());
}

#[test]
fn test_memory_store_lists_in_identity_order() {
    let store = MemoryStore::new()
        .with_document("b.md", "2")
        .with_document("a.md", "1");
    assert_eq!(store.list_documents().expect("List"), vec!["a.md", "b.md"]);
}
