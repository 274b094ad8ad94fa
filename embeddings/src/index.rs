//! Insertion-ordered similarity index with JSON persistence.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::{SimilarityResult, find_top_k, normalize};

/// An entry in the similarity index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Unique identifier.
    pub id: String,

    /// The embedding vector (normalized).
    pub embedding: Embedding,
}

/// A similarity index over embedding vectors.
///
/// Entries keep insertion order, so documents with tied scores rank in the
/// order they were indexed. Stored embeddings are normalized to unit length
/// on insert.
pub struct SimilarityIndex {
    /// Stored entries, in insertion order.
    entries: Vec<IndexEntry>,

    /// Position of each id within `entries`.
    positions: HashMap<String, usize>,

    /// Expected dimension of embeddings.
    dimension: usize,
}

impl SimilarityIndex {
    /// Create a new similarity index.
    pub fn new(dimension: usize) -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            dimension,
        }
    }

    /// The dimension this index expects of every embedding.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Add an embedding to the index.
    ///
    /// Re-adding an existing id replaces the stored embedding in place, so
    /// the entry keeps its original position. Zero-magnitude embeddings are
    /// rejected: they cannot be ranked by cosine similarity.
    pub fn add(&mut self, id: impl Into<String>, mut embedding: Embedding) -> Result<()> {
        let id = id.into();

        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        if embedding.iter().all(|x| *x == 0.0) {
            return Err(EmbeddingError::DegenerateVector);
        }

        normalize(&mut embedding);

        match self.positions.get(&id) {
            Some(&pos) => {
                self.entries[pos].embedding = embedding;
            }
            None => {
                self.positions.insert(id.clone(), self.entries.len());
                self.entries.push(IndexEntry {
                    id: id.clone(),
                    embedding,
                });
            }
        }

        debug!("Added embedding to index: {id}");
        Ok(())
    }

    /// Get an entry by ID.
    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.positions.get(id).map(|&pos| &self.entries[pos])
    }

    /// Check if an ID exists in the index.
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Get the number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Search for the `k` entries most similar to `query`.
    ///
    /// Empty index returns an empty result set for any `k`.
    pub fn search(&self, query: &Embedding, k: usize) -> Result<Vec<SimilarityResult>> {
        if query.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let candidates: Vec<(String, Embedding)> = self
            .entries
            .iter()
            .map(|e| (e.id.clone(), e.embedding.clone()))
            .collect();

        find_top_k(query, &candidates, k)
    }

    /// Serialize the index to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Load an index from JSON.
    pub fn from_json(json: &str, dimension: usize) -> Result<Self> {
        let entries: Vec<IndexEntry> = serde_json::from_str(json)?;

        let mut index = Self::new(dimension);
        for entry in entries {
            if entry.embedding.len() != dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: dimension,
                    actual: entry.embedding.len(),
                });
            }
            index.positions.insert(entry.id.clone(), index.entries.len());
            index.entries.push(entry);
        }

        info!("Loaded {} entries into similarity index", index.len());
        Ok(index)
    }

    /// Write the index as JSON to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        debug!("Saved {} index entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Load an index from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>, dimension: usize) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json, dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_index_add_and_get() {
        let mut index = SimilarityIndex::new(3);
        index.add("item1", vec![1.0, 0.0, 0.0]).unwrap();

        assert!(index.contains("item1"));
        assert!(!index.contains("item2"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_search() {
        let mut index = SimilarityIndex::new(3);
        index.add("a", vec![1.0, 0.0, 0.0]).unwrap();
        index.add("b", vec![0.0, 1.0, 0.0]).unwrap();
        index.add("c", vec![0.7, 0.7, 0.0]).unwrap();

        let query = vec![1.0, 0.0, 0.0];
        let results = index.search(&query, 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "a");
        assert_eq!(results[1].id, "c");
    }

    #[test]
    fn test_index_search_preserves_insertion_order_on_ties() {
        let mut index = SimilarityIndex::new(2);
        index.add("first", vec![2.0, 0.0]).unwrap();
        index.add("second", vec![5.0, 0.0]).unwrap();

        // Both normalize to the same unit vector, so the scores tie exactly.
        let results = index.search(&vec![1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].id, "first");
        assert_eq!(results[1].id, "second");
    }

    #[test]
    fn test_index_replace_keeps_position() {
        let mut index = SimilarityIndex::new(2);
        index.add("a", vec![1.0, 0.0]).unwrap();
        index.add("b", vec![0.0, 1.0]).unwrap();
        index.add("a", vec![0.0, 1.0]).unwrap();

        assert_eq!(index.len(), 2);
        let results = index.search(&vec![0.0, 1.0], 2).unwrap();
        assert_eq!(results[0].id, "a");
        assert_eq!(results[1].id, "b");
    }

    #[test]
    fn test_index_search_empty() {
        let index = SimilarityIndex::new(3);
        let results = index.search(&vec![1.0, 0.0, 0.0], 5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_dimension_mismatch_on_add() {
        let mut index = SimilarityIndex::new(3);
        let result = index.add("bad", vec![1.0, 0.0]);
        assert!(matches!(
            result,
            Err(EmbeddingError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch_on_search() {
        let mut index = SimilarityIndex::new(3);
        index.add("a", vec![1.0, 0.0, 0.0]).unwrap();
        let result = index.search(&vec![1.0, 0.0], 1);
        assert!(matches!(
            result,
            Err(EmbeddingError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_vector_rejected_on_add() {
        let mut index = SimilarityIndex::new(2);
        let result = index.add("zero", vec![0.0, 0.0]);
        assert!(matches!(result, Err(EmbeddingError::DegenerateVector)));
    }

    #[test]
    fn test_json_round_trip() {
        let mut index = SimilarityIndex::new(2);
        index.add("a", vec![1.0, 0.0]).unwrap();
        index.add("b", vec![0.0, 1.0]).unwrap();

        let json = index.to_json().unwrap();
        let loaded = SimilarityIndex::from_json(&json, 2).unwrap();

        assert_eq!(loaded.len(), 2);
        let results = loaded.search(&vec![1.0, 0.0], 1).unwrap();
        assert_eq!(results[0].id, "a");
    }
}
