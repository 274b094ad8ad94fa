//! Error types for document loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while loading documents.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Docs root does not exist or is not a directory.
    #[error("docs root not found: {0}")]
    DocsRootNotFound(PathBuf),

    /// Failed to read a document.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
