//! Markdown file discovery and loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{LoaderError, Result};
use crate::markdown::extract_plain_text;

/// A loaded Markdown document, ready for embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedDoc {
    /// Path to the file, relative to the docs root where possible.
    pub path: String,

    /// Raw Markdown content, returned verbatim in search results.
    pub content: String,

    /// Plain-text rendering used as embedding input.
    pub plain_text: String,
}

/// Loads Markdown documents from a directory subtree.
///
/// Files are discovered recursively, filtered to the `md` extension, and
/// returned sorted by path so the corpus order is reproducible across runs.
pub struct DocLoader {
    /// Root directory to scan.
    root: PathBuf,

    /// Patterns to exclude (glob patterns).
    exclude_patterns: Vec<String>,
}

impl DocLoader {
    /// Create a loader for the given docs root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_patterns: Self::default_excludes(),
        }
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Get default exclude patterns.
    fn default_excludes() -> Vec<String> {
        vec![
            "**/.git/**".to_string(),
            "**/node_modules/**".to_string(),
            "**/target/**".to_string(),
            "**/.obsidian/**".to_string(),
        ]
    }

    /// Check if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob) = glob::Pattern::new(pattern)
                && glob.matches(&path_str)
            {
                return true;
            }
        }

        false
    }

    /// Load every Markdown file under the root.
    pub fn load(&self) -> Result<Vec<LoadedDoc>> {
        if !self.root.is_dir() {
            return Err(LoaderError::DocsRootNotFound(self.root.clone()));
        }

        let mut paths: Vec<PathBuf> = Vec::new();

        for entry in WalkDir::new(&self.root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();

            if !entry.file_type().is_file() || self.should_exclude(path) {
                continue;
            }

            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }

            paths.push(path.to_path_buf());
        }

        // Corpus order must be reproducible across runs.
        paths.sort();

        let mut docs = Vec::with_capacity(paths.len());
        for path in paths {
            let content = std::fs::read_to_string(&path).map_err(|source| LoaderError::Read {
                path: path.clone(),
                source,
            })?;

            let plain_text = extract_plain_text(&content);
            if plain_text.is_empty() {
                warn!("Document has no extractable text: {}", path.display());
            }

            let display_path = path
                .strip_prefix(&self.root)
                .unwrap_or(&path)
                .to_string_lossy()
                .to_string();

            debug!("Loaded document: {display_path}");
            docs.push(LoadedDoc {
                path: display_path,
                content,
                plain_text,
            });
        }

        info!("Loaded {} markdown files from {}", docs.len(), self.root.display());
        Ok(docs)
    }
}
