//! The search engine: corpus construction at startup, ranking per query.

use tracing::{debug, info, warn};

use raglite_doc_loader::{DocLoader, LoadedDoc};
use raglite_embeddings::{
    EmbeddingProvider, EmbeddingRequest, HashingProvider, OpenAIProvider, SimilarityIndex,
};

use crate::config::{EmbeddingConfig, ProviderType, RankerBackend, SearchConfig};
use crate::corpus::{Corpus, Document, ScoredMatch};
use crate::error::{Result, SearchError};
use crate::ranker::{BruteForceRanker, IndexedRanker, Ranker};

/// The raglite search engine.
///
/// Construction loads the docs directory, embeds every document, and
/// freezes the result into an immutable [`Corpus`]. Queries embed the query
/// text with the same provider and hand the vector to the configured
/// ranking backend. The engine never mutates after construction, so it can
/// be shared across request handlers without locking.
pub struct SearchEngine {
    config: SearchConfig,
    corpus: Corpus,
    ranker: Box<dyn Ranker>,
    provider: Box<dyn EmbeddingProvider>,
}

impl SearchEngine {
    /// Build an engine from configuration.
    pub async fn new(config: SearchConfig) -> Result<Self> {
        info!(
            "Initializing search engine over {} ({:?} backend)",
            config.docs_dir.display(),
            config.backend
        );

        let provider = build_provider(&config.embedding);
        if !provider.is_available() {
            return Err(SearchError::Config(format!(
                "embedding provider '{}' is not available",
                provider.name()
            )));
        }

        let docs = DocLoader::new(&config.docs_dir).load()?;
        let dimension = provider.default_dimension();

        let (corpus, ranker) = match config.backend {
            RankerBackend::BruteForce => {
                let corpus = embed_docs(provider.as_ref(), &config.embedding, docs).await?;
                let ranker: Box<dyn Ranker> = Box::new(BruteForceRanker::new());
                (corpus, ranker)
            }
            RankerBackend::Indexed => {
                build_indexed(provider.as_ref(), &config, docs, dimension).await?
            }
        };

        info!(
            "Search engine ready: {} documents, '{}' backend",
            corpus.len(),
            ranker.name()
        );

        Ok(Self {
            config,
            corpus,
            ranker,
            provider,
        })
    }

    /// Answer a query: embed the text and return the top `k` matches.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredMatch>> {
        debug!("Searching for {k} matches");

        let mut request = EmbeddingRequest::new(query);
        if let Some(model) = &self.config.embedding.model {
            request = request.with_model(model.clone());
        }

        let response = self.provider.embed(request).await?;
        self.ranker.top_k(&self.corpus, &response.embedding, k)
    }

    /// The indexed corpus.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Name of the active ranking backend.
    pub fn backend_name(&self) -> &str {
        self.ranker.name()
    }
}

fn build_provider(config: &EmbeddingConfig) -> Box<dyn EmbeddingProvider> {
    match config.provider {
        ProviderType::OpenAI => {
            let mut provider = OpenAIProvider::new();
            if let Some(model) = &config.model {
                provider = provider.with_model(model.clone());
            }
            Box::new(provider)
        }
        ProviderType::Hashing => Box::new(HashingProvider::new()),
    }
}

/// Embed every document's plain text and freeze the corpus.
async fn embed_docs(
    provider: &dyn EmbeddingProvider,
    config: &EmbeddingConfig,
    docs: Vec<LoadedDoc>,
) -> Result<Corpus> {
    let requests: Vec<EmbeddingRequest> = docs
        .iter()
        .map(|doc| {
            let mut request = EmbeddingRequest::new(doc.plain_text.clone());
            if let Some(model) = &config.model {
                request = request.with_model(model.clone());
            }
            request
        })
        .collect();

    let responses = provider.embed_batch(requests).await?;

    let documents = docs
        .into_iter()
        .zip(responses)
        .map(|(doc, response)| Document {
            path: doc.path,
            content: doc.content,
            embedding: response.embedding,
        })
        .collect();

    Ok(Corpus::new(documents))
}

/// Set up the indexed backend, reusing a persisted index when it still
/// matches the loaded document set.
async fn build_indexed(
    provider: &dyn EmbeddingProvider,
    config: &SearchConfig,
    docs: Vec<LoadedDoc>,
    dimension: usize,
) -> Result<(Corpus, Box<dyn Ranker>)> {
    if let Some(path) = &config.index_path
        && path.exists()
    {
        let index = SimilarityIndex::load(path, dimension)?;
        if index_covers(&index, &docs) {
            info!("Loaded existing index from {}", path.display());

            // Stored vectors are normalized, which leaves cosine scores
            // unchanged, so the corpus can take them as-is.
            let documents = docs
                .into_iter()
                .map(|doc| {
                    let embedding = index
                        .get(&doc.path)
                        .map(|entry| entry.embedding.clone())
                        .unwrap_or_default();
                    Document {
                        path: doc.path,
                        content: doc.content,
                        embedding,
                    }
                })
                .collect();

            return Ok((Corpus::new(documents), Box::new(IndexedRanker::new(index))));
        }

        warn!(
            "Index at {} no longer matches the docs directory, rebuilding",
            path.display()
        );
    }

    let corpus = embed_docs(provider, &config.embedding, docs).await?;
    let ranker = IndexedRanker::build(&corpus, dimension)?;

    if let Some(path) = &config.index_path {
        ranker.index().save(path)?;
        info!("Saved index to {}", path.display());
    }

    Ok((corpus, Box::new(ranker)))
}

/// Whether a persisted index contains exactly the loaded documents.
fn index_covers(index: &SimilarityIndex, docs: &[LoadedDoc]) -> bool {
    index.len() == docs.len() && docs.iter().all(|doc| index.contains(&doc.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write_docs(dir: &TempDir, files: &[(&str, &str)]) {
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
    }

    fn config(dir: &TempDir) -> SearchConfig {
        SearchConfig::new(dir.path())
    }

    #[tokio::test]
    async fn test_search_returns_relevant_document_first() {
        let temp = TempDir::new().unwrap();
        write_docs(
            &temp,
            &[
                ("cooking.md", "# Cooking\n\nRecipes for pasta and sauces."),
                ("rust.md", "# Rust\n\nOwnership borrowing and lifetimes."),
            ],
        );

        let engine = SearchEngine::new(config(&temp)).await.unwrap();
        let matches = engine
            .search("ownership borrowing lifetimes", 1)
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].file, "rust.md");
        assert!(matches[0].content.starts_with("# Rust"));
    }

    #[tokio::test]
    async fn test_search_empty_corpus() {
        let temp = TempDir::new().unwrap();

        let engine = SearchEngine::new(config(&temp)).await.unwrap();
        let matches = engine.search("anything", 3).await.unwrap();

        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_search_k_exceeds_corpus() {
        let temp = TempDir::new().unwrap();
        write_docs(&temp, &[("one.md", "alpha"), ("two.md", "beta")]);

        let engine = SearchEngine::new(config(&temp)).await.unwrap();
        let matches = engine.search("alpha", 50).await.unwrap();

        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn test_indexed_backend_matches_brute_force() {
        let temp = TempDir::new().unwrap();
        write_docs(
            &temp,
            &[
                ("a.md", "rust async runtimes"),
                ("b.md", "gardening in spring"),
                ("c.md", "rust error handling"),
            ],
        );

        let brute = SearchEngine::new(config(&temp)).await.unwrap();
        let indexed = SearchEngine::new(config(&temp).with_backend(RankerBackend::Indexed))
            .await
            .unwrap();

        let query = "rust error handling";
        let brute_matches = brute.search(query, 3).await.unwrap();
        let indexed_matches = indexed.search(query, 3).await.unwrap();

        let brute_files: Vec<&str> = brute_matches.iter().map(|m| m.file.as_str()).collect();
        let indexed_files: Vec<&str> = indexed_matches.iter().map(|m| m.file.as_str()).collect();
        assert_eq!(brute_files, indexed_files);
    }

    #[tokio::test]
    async fn test_indexed_backend_persists_and_reloads() {
        let temp = TempDir::new().unwrap();
        write_docs(&temp, &[("doc.md", "persisted content")]);
        let index_path = temp.path().join("state").join("index.json");

        let config = SearchConfig::new(temp.path())
            .with_backend(RankerBackend::Indexed)
            .with_index_path(&index_path);

        let first = SearchEngine::new(config.clone()).await.unwrap();
        assert!(index_path.exists());
        let expected = first.search("persisted content", 1).await.unwrap();

        // Second engine loads the saved index instead of re-embedding.
        let second = SearchEngine::new(config).await.unwrap();
        let matches = second.search("persisted content", 1).await.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].file, expected[0].file);
        assert!((matches[0].score - expected[0].score).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_stale_index_is_rebuilt() {
        let temp = TempDir::new().unwrap();
        write_docs(&temp, &[("old.md", "original doc")]);
        let index_path = temp.path().join("index.json");

        let config = SearchConfig::new(temp.path())
            .with_backend(RankerBackend::Indexed)
            .with_index_path(&index_path);

        SearchEngine::new(config.clone()).await.unwrap();

        // Add a document after the index was persisted.
        write_docs(&temp, &[("new.md", "freshly added doc")]);

        let engine = SearchEngine::new(config).await.unwrap();
        assert_eq!(engine.corpus().len(), 2);

        let matches = engine.search("freshly added doc", 1).await.unwrap();
        assert_eq!(matches[0].file, "new.md");
    }

    #[tokio::test]
    async fn test_missing_docs_dir_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config = SearchConfig::new(temp.path().join("nope"));

        let result = SearchEngine::new(config).await;
        assert!(matches!(result, Err(SearchError::Loader(_))));
    }
}
