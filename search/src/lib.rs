//! # Search Engine
//!
//! This crate ties the raglite pieces together: it builds an immutable
//! [`Corpus`] from a docs directory at startup (load, embed, freeze) and
//! answers top-k queries against it through a configurable ranking backend.
//!
//! Two backends implement the same [`Ranker`] contract:
//!
//! - [`BruteForceRanker`]: a linear scan computing cosine similarity over
//!   the corpus vectors per query
//! - [`IndexedRanker`]: delegates to a [`SimilarityIndex`], which can be
//!   persisted to disk and reloaded across restarts

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod ranker;

pub use config::{EmbeddingConfig, ProviderType, RankerBackend, SearchConfig};
pub use corpus::{Corpus, Document, ScoredMatch};
pub use engine::SearchEngine;
pub use error::{Result, SearchError};
pub use ranker::{BruteForceRanker, IndexedRanker, Ranker};

// Re-export from dependencies for convenience
pub use raglite_doc_loader::{DocLoader, LoadedDoc};
pub use raglite_embeddings::{EmbeddingError, EmbeddingProvider, SimilarityIndex};

/// Number of results returned when a query does not specify `k`.
pub const DEFAULT_TOP_K: usize = 3;
