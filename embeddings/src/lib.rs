//! # Embeddings
//!
//! This crate provides embedding generation and cosine-similarity search
//! for the raglite document search service.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors via a provider
//! - **Similarity Search**: Brute-force top-k ranking by cosine similarity
//! - **Similarity Index**: Insertion-ordered index with JSON persistence
//! - **Multiple Providers**: OpenAI API or a deterministic local embedder

pub mod error;
pub mod index;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use index::SimilarityIndex;
pub use provider::{
    EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, HashingProvider, OpenAIProvider,
};
pub use similarity::{cosine_similarity, find_top_k, SimilarityResult};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of the default local hashing embedder (matches MiniLM-class models).
pub const DEFAULT_DIMENSION: usize = 384;
