//! Similarity computation for embeddings.

use serde::{Deserialize, Serialize};

use crate::error::{EmbeddingError, Result};

/// Lower bound applied to each vector norm so all-zero vectors score 0.
const NORM_EPSILON: f32 = 1e-12;

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors (or a degenerate all-zero vector)
/// - -1.0 means opposite vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a = norm(a).max(NORM_EPSILON);
    let magnitude_b = norm(b).max(NORM_EPSILON);

    Ok(dot_product / (magnitude_a * magnitude_b))
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// The closest stored vector to a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestMatch {
    /// Position of the winning row.
    pub index: usize,

    /// Raw cosine score of the winning row.
    pub score: f32,
}

/// Scan every row of `vectors` and return the one most similar to `query`.
///
/// This is a plain O(N·D) scan. On equal scores the lowest index wins.
/// Returns `None` when `vectors` is empty or every score is NaN.
pub fn best_match<V>(query: &[f32], vectors: &[V]) -> Result<Option<BestMatch>>
where
    V: AsRef<[f32]>,
{
    let mut best: Option<BestMatch> = None;

    for (index, candidate) in vectors.iter().enumerate() {
        let score = cosine_similarity(query, candidate.as_ref())?;
        let better = match best {
            Some(current) => score > current.score,
            None => !score.is_nan(),
        };
        if better {
            best = Some(BestMatch { index, score });
        }
    }

    Ok(best)
}
