//! Ranking backends: brute-force scan and delegated index.

use tracing::debug;

use raglite_embeddings::{Embedding, SimilarityIndex, find_top_k};

use crate::corpus::{Corpus, ScoredMatch};
use crate::error::Result;

/// A ranking backend: given a query vector, return the top-k documents.
///
/// Implementations are read-only over the corpus and hold no per-query
/// state, so a single ranker serves concurrent requests without locking.
pub trait Ranker: Send + Sync {
    /// Rank `corpus` against `query` and return the `k` best matches,
    /// ordered descending by score with ties in corpus order.
    fn top_k(&self, corpus: &Corpus, query: &Embedding, k: usize) -> Result<Vec<ScoredMatch>>;

    /// Name of this backend, for logs.
    fn name(&self) -> &str;
}

/// Brute-force backend: a linear scan over the corpus per query.
#[derive(Debug, Default)]
pub struct BruteForceRanker;

impl BruteForceRanker {
    /// Create a brute-force ranker.
    pub fn new() -> Self {
        Self
    }
}

impl Ranker for BruteForceRanker {
    fn top_k(&self, corpus: &Corpus, query: &Embedding, k: usize) -> Result<Vec<ScoredMatch>> {
        let candidates: Vec<(String, Embedding)> = corpus
            .iter()
            .map(|d| (d.path.clone(), d.embedding.clone()))
            .collect();

        let results = find_top_k(query, &candidates, k)?;
        debug!("Brute-force scan ranked {} documents", corpus.len());

        let by_path = corpus.by_path();
        Ok(results
            .into_iter()
            .filter_map(|r| {
                by_path.get(r.id.as_str()).map(|doc| ScoredMatch {
                    file: r.id,
                    score: r.score,
                    content: doc.content.clone(),
                })
            })
            .collect())
    }

    fn name(&self) -> &str {
        "brute_force"
    }
}

/// Delegated-index backend: search goes through a [`SimilarityIndex`].
pub struct IndexedRanker {
    index: SimilarityIndex,
}

impl IndexedRanker {
    /// Wrap an existing index (for example one loaded from disk).
    pub fn new(index: SimilarityIndex) -> Self {
        Self { index }
    }

    /// Build an index over the corpus embeddings.
    ///
    /// `dimension` is needed explicitly so an empty corpus still produces a
    /// usable index.
    pub fn build(corpus: &Corpus, dimension: usize) -> Result<Self> {
        let mut index = SimilarityIndex::new(dimension);
        for doc in corpus.iter() {
            index.add(doc.path.clone(), doc.embedding.clone())?;
        }
        debug!("Built similarity index over {} documents", index.len());
        Ok(Self { index })
    }

    /// The underlying index.
    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }
}

impl Ranker for IndexedRanker {
    fn top_k(&self, corpus: &Corpus, query: &Embedding, k: usize) -> Result<Vec<ScoredMatch>> {
        let results = self.index.search(query, k)?;

        let by_path = corpus.by_path();
        Ok(results
            .into_iter()
            .filter_map(|r| {
                by_path.get(r.id.as_str()).map(|doc| ScoredMatch {
                    file: r.id,
                    score: r.score,
                    content: doc.content.clone(),
                })
            })
            .collect())
    }

    fn name(&self) -> &str {
        "indexed"
    }
}
