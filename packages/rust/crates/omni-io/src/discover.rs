//! Vault document discovery.
//!
//! Walks a vault directory with `walkdir` and returns the relative paths of
//! the documents a find-and-replace run should see.

use std::path::{Component, Path};

use walkdir::{DirEntry, WalkDir};

/// Options for document discovery.
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// File extensions to include (e.g., `[".md"]`). Leading dots are optional.
    pub extensions: Vec<String>,
    /// Maximum file size in bytes (default: 1MB)
    pub max_file_size: u64,
    /// Skip hidden files and directories
    pub skip_hidden: bool,
    /// Skip directories by name (e.g., `[".obsidian", ".git"]`)
    pub skip_dirs: Vec<String>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            extensions: vec![".md".to_string()],
            max_file_size: 1024 * 1024, // 1MB
            skip_hidden: true,
            skip_dirs: vec![
                ".obsidian".to_string(),
                ".git".to_string(),
                "node_modules".to_string(),
                ".trash".to_string(),
            ],
        }
    }
}

/// Discover documents under `root`.
///
/// Returned paths are relative to `root`, `/`-separated and sorted, so the
/// same vault always yields the same document order. A missing or
/// non-directory root yields an empty list.
#[must_use]
pub fn discover_documents(root: &Path, options: &DiscoverOptions) -> Vec<String> {
    if !root.is_dir() {
        return Vec::new();
    }

    let extensions: Vec<String> = options
        .extensions
        .iter()
        .map(|e| normalize_extension(e))
        .collect();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry, options));

    let mut documents: Vec<String> = walker
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), &extensions))
        .filter(|entry| {
            entry
                .metadata()
                .is_ok_and(|meta| meta.len() <= options.max_file_size)
        })
        .filter_map(|entry| {
            let rel = entry.path().strip_prefix(root).ok()?;
            to_document_id(rel)
        })
        .collect();

    documents.sort();
    tracing::debug!(
        root = %root.display(),
        count = documents.len(),
        "discovered vault documents"
    );
    documents
}

fn is_skipped(entry: &DirEntry, options: &DiscoverOptions) -> bool {
    let Some(name) = entry.file_name().to_str() else {
        return true;
    };
    if options.skip_hidden && name.starts_with('.') {
        return true;
    }
    entry.file_type().is_dir() && options.skip_dirs.iter().any(|skip| skip == name)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext))
}

/// Join normal components with `/`; anything else (`..`, roots) is rejected.
fn to_document_id(rel: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Normalize an extension filter to lowercase without the leading dot.
fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
