//! Runtime settings.
//!
//! Loaded from YAML. Resolution order: explicit path, then the
//! `OMNI_REPLACE_CONFIG` environment variable, then built-in defaults.
//! Every field is optional in the file.

use std::path::{Path, PathBuf};

use omni_io::DiscoverOptions;
use serde::{Deserialize, Serialize};

use crate::batch::{ChunkConfig, DEFAULT_CHUNK_SIZE};
use crate::error::ReplaceError;
use crate::scanner::{ContextWindow, DEFAULT_CONTEXT_LINES, DEFAULT_SNIPPET_LENGTH};
use crate::types::DEFAULT_FLAGS;

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "OMNI_REPLACE_CONFIG";

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaceSettings {
    /// Which vault files are documents.
    pub vault: VaultSettings,
    /// Search defaults.
    pub search: SearchSettings,
}

/// `vault:` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSettings {
    /// Document extensions.
    pub extensions: Vec<String>,
    /// Directory names never entered.
    pub skip_dirs: Vec<String>,
    /// Skip dot-files and dot-directories.
    pub skip_hidden: bool,
    /// Largest document read, in bytes.
    pub max_file_size: u64,
}

impl Default for VaultSettings {
    fn default() -> Self {
        let options = DiscoverOptions::default();
        Self {
            extensions: options.extensions,
            skip_dirs: options.skip_dirs,
            skip_hidden: options.skip_hidden,
            max_file_size: options.max_file_size,
        }
    }
}

impl VaultSettings {
    /// Discovery options for a `VaultStore`.
    #[must_use]
    pub fn discover_options(&self) -> DiscoverOptions {
        DiscoverOptions {
            extensions: self.extensions.clone(),
            max_file_size: self.max_file_size,
            skip_hidden: self.skip_hidden,
            skip_dirs: self.skip_dirs.clone(),
        }
    }
}

/// `search:` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Default flag string.
    pub flags: String,
    /// Default for case adjustment.
    pub adjust_case: bool,
    /// Context lines on each side of a match.
    pub context_lines: usize,
    /// Characters kept per context line.
    pub snippet_length: usize,
    /// Documents per chunk.
    pub chunk_size: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            flags: DEFAULT_FLAGS.to_string(),
            adjust_case: false,
            context_lines: DEFAULT_CONTEXT_LINES,
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SearchSettings {
    /// Chunking and context configuration.
    #[must_use]
    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig {
            chunk_size: self.chunk_size,
            window: ContextWindow {
                lines: self.context_lines,
                snippet_length: self.snippet_length,
            },
        }
    }
}

impl ReplaceSettings {
    /// Parse settings from YAML text.
    ///
    /// # Errors
    /// `Config` for malformed YAML or invalid values.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ReplaceError> {
        let settings: Self = if raw.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(raw).map_err(|e| ReplaceError::Config(e.to_string()))?
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file.
    ///
    /// # Errors
    /// `Config` when the file is unreadable or invalid.
    pub fn load(path: &Path) -> Result<Self, ReplaceError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ReplaceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&raw)
    }

    /// Resolve settings from `explicit`, then `OMNI_REPLACE_CONFIG`, then
    /// defaults.
    ///
    /// # Errors
    /// `Config` when a named file is unreadable or invalid.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ReplaceError> {
        let from_env = std::env::var(CONFIG_ENV)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ReplaceError> {
        if self.search.chunk_size == 0 {
            return Err(ReplaceError::Config("search.chunk_size must be positive".to_string()));
        }
        if self.search.snippet_length == 0 {
            return Err(ReplaceError::Config(
                "search.snippet_length must be positive".to_string(),
            ));
        }
        if self.search.flags.parse::<crate::pattern::RegexFlags>().is_err() {
            return Err(ReplaceError::Config(format!(
                "search.flags contains an unknown flag: {:?}",
                self.search.flags
            )));
        }
        Ok(())
    }
}
