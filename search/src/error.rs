//! Error types for the search engine.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur in the search engine.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Document loading error.
    #[error("loader error: {0}")]
    Loader(#[from] raglite_doc_loader::LoaderError),

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] raglite_embeddings::EmbeddingError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
