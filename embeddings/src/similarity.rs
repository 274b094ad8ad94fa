//! Similarity computation for embeddings.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors
/// - -1.0 means opposite direction
///
/// Fails with [`EmbeddingError::DimensionMismatch`] when the vectors differ
/// in length, and with [`EmbeddingError::DegenerateVector`] when either
/// vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Err(EmbeddingError::DegenerateVector);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

/// A similarity search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// ID of the matched item.
    pub id: String,

    /// Similarity score.
    pub score: f32,
}

impl SimilarityResult {
    /// Create a new similarity result.
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Find the top-k most similar embeddings among `candidates`.
///
/// Scores every candidate against the query (a linear scan), sorts
/// descending by score, and truncates to the first `k` results. The sort is
/// stable, so candidates with equal scores keep their input order. An empty
/// candidate list or `k == 0` yields an empty result, never an error.
pub fn find_top_k(
    query: &Embedding,
    candidates: &[(String, Embedding)],
    k: usize,
) -> Result<Vec<SimilarityResult>> {
    let mut scores: Vec<(OrderedFloat<f32>, &str)> = Vec::with_capacity(candidates.len());

    for (id, embedding) in candidates {
        let score = cosine_similarity(query, embedding)?;
        scores.push((OrderedFloat(score), id.as_str()));
    }

    // Stable sort: ties keep candidate order.
    scores.sort_by(|a, b| b.0.cmp(&a.0));

    let results: Vec<SimilarityResult> = scores
        .into_iter()
        .take(k)
        .map(|(score, id)| SimilarityResult::new(id, score.0))
        .collect();

    Ok(results)
}

/// Normalize an embedding to unit length. Zero vectors are left untouched.
pub fn normalize(embedding: &mut Embedding) {
    let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for x in embedding.iter_mut() {
            *x /= magnitude;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![0.3, 1.2, -0.5];
        let sim = cosine_similarity(&a, &a).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_symmetric() {
        let a = vec![0.3, 1.2, -0.5];
        let b = vec![1.0, 0.1, 0.7];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!(matches!(
            cosine_similarity(&a, &b),
            Err(EmbeddingError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_degenerate_vector() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!(matches!(
            cosine_similarity(&a, &b),
            Err(EmbeddingError::DegenerateVector)
        ));
        assert!(matches!(
            cosine_similarity(&b, &a),
            Err(EmbeddingError::DegenerateVector)
        ));
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_find_top_k() {
        let query = vec![1.0, 0.0, 0.0];
        let candidates = vec![
            ("a".to_string(), vec![1.0, 0.0, 0.0]), // similarity 1.0
            ("b".to_string(), vec![0.0, 1.0, 0.0]), // similarity 0.0
            ("c".to_string(), vec![0.7, 0.7, 0.0]), // similarity ~0.7
        ];

        let results = find_top_k(&query, &candidates, 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "a");
        assert_eq!(results[1].id, "c");
    }

    #[test]
    fn test_find_top_k_stable_on_ties() {
        // a and c score identically; a comes first in the input, so it must
        // come first in the output and b is excluded.
        let query = vec![1.0, 0.0];
        let candidates = vec![
            ("a".to_string(), vec![0.9, 0.4358899]),
            ("b".to_string(), vec![0.5, 0.8660254]),
            ("c".to_string(), vec![0.9, 0.4358899]),
        ];

        let results = find_top_k(&query, &candidates, 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "a");
        assert_eq!(results[1].id, "c");
    }

    #[test]
    fn test_find_top_k_zero_k() {
        let query = vec![1.0, 0.0];
        let candidates = vec![("a".to_string(), vec![1.0, 0.0])];
        let results = find_top_k(&query, &candidates, 0).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_find_top_k_k_exceeds_candidates() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            ("a".to_string(), vec![0.0, 1.0]),
            ("b".to_string(), vec![1.0, 0.0]),
        ];
        let results = find_top_k(&query, &candidates, 10).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "b");
        assert_eq!(results[1].id, "a");
    }

    #[test]
    fn test_find_top_k_empty_candidates() {
        let query = vec![1.0, 0.0];
        let results = find_top_k(&query, &[], 3).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_find_top_k_negative_scores_included() {
        // No score threshold: anti-correlated candidates still rank.
        let query = vec![1.0, 0.0];
        let candidates = vec![("opposite".to_string(), vec![-1.0, 0.0])];
        let results = find_top_k(&query, &candidates, 1).unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].score - (-1.0)).abs() < 1e-6);
    }
}
