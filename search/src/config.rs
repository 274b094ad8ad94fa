//! Configuration for the search engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Directory of Markdown files to index.
    pub docs_dir: PathBuf,

    /// Which ranking backend to use.
    pub backend: RankerBackend,

    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,

    /// Where the indexed backend persists its index. `None` disables
    /// persistence; the brute-force backend never persists.
    pub index_path: Option<PathBuf>,
}

impl SearchConfig {
    /// Create a configuration for the given docs directory with defaults.
    pub fn new(docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            backend: RankerBackend::BruteForce,
            embedding: EmbeddingConfig::default(),
            index_path: None,
        }
    }

    /// Set the ranking backend.
    pub fn with_backend(mut self, backend: RankerBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the embedding configuration.
    pub fn with_embedding(mut self, config: EmbeddingConfig) -> Self {
        self.embedding = config;
        self
    }

    /// Set the index persistence path.
    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = Some(path.into());
        self
    }
}

/// Which ranking backend the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankerBackend {
    /// Linear scan over the corpus per query.
    BruteForce,

    /// Delegate search to a similarity index.
    Indexed,
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: ProviderType,

    /// Model override (provider default when `None`).
    pub model: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::Hashing,
            model: None,
        }
    }
}

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// OpenAI embeddings API.
    OpenAI,

    /// Deterministic local feature-hashing embedder.
    Hashing,
}
