//! The corpus data model: documents, their embeddings, and scored matches.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use raglite_embeddings::Embedding;

/// An indexed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// File path, unique within the corpus.
    pub path: String,

    /// Raw Markdown content.
    pub content: String,

    /// Embedding of the document's plain text.
    pub embedding: Embedding,
}

/// An ordered, immutable collection of indexed documents.
///
/// Insertion order is index order; ties in ranking resolve to this order.
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    docs: Vec<Document>,
}

impl Corpus {
    /// Build a corpus from documents, keeping their order.
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the corpus has no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Iterate the documents in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }

    /// Get a document by position.
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.docs.get(index)
    }

    /// Map document paths to their documents for id-based lookup.
    pub fn by_path(&self) -> HashMap<&str, &Document> {
        self.docs.iter().map(|d| (d.path.as_str(), d)).collect()
    }
}

/// A ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMatch {
    /// Path of the matched document.
    pub file: String,

    /// Cosine similarity to the query, in [-1, 1].
    pub score: f32,

    /// Raw Markdown content of the matched document.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(path: &str) -> Document {
        Document {
            path: path.to_string(),
            content: format!("content of {path}"),
            embedding: vec![1.0, 0.0],
        }
    }

    #[test]
    fn test_corpus_preserves_order() {
        let corpus = Corpus::new(vec![doc("b.md"), doc("a.md")]);

        let paths: Vec<&str> = corpus.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["b.md", "a.md"]);
    }

    #[test]
    fn test_corpus_lookup() {
        let corpus = Corpus::new(vec![doc("a.md"), doc("b.md")]);
        let by_path = corpus.by_path();

        assert_eq!(by_path["a.md"].content, "content of a.md");
        assert!(!by_path.contains_key("c.md"));
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = Corpus::default();
        assert!(corpus.is_empty());
        assert_eq!(corpus.len(), 0);
    }
}
