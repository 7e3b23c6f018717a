//! Exact nearest-neighbor search over an in-memory vector set.
//!
//! [`FlatL2Index`] is a brute-force flat index: `search` scans every
//! stored vector and ranks by squared L2 distance, O(n·d) per query.
//! The corpus is one document's chunk set — typically hundreds of
//! vectors, not millions — so an exact linear scan is the right tool.
//! The [`IndexBackend`] trait keeps the seam open for swapping in a
//! different structure without touching the retriever.
//!
//! The index is immutable after [`FlatL2Index::build`]: there is no
//! insert or delete, and concurrent reads need no synchronization.

use serde::Serialize;

use crate::embedding::l2_squared;
use crate::error::{Result, RetrievalError};

/// One search hit: a stored vector's position and its distance to the
/// query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    /// Insertion position in the index. Positions equal chunk ids when
    /// the index is built from a chunk sequence in order.
    pub position: usize,
    /// Squared L2 distance to the query; smaller = more similar.
    pub distance: f32,
}

/// Read-only search interface over a built vector index.
pub trait IndexBackend: Send + Sync {
    /// Number of stored vectors.
    fn len(&self) -> usize;

    /// Returns `true` if the index holds no vectors. `build` rejects
    /// empty input, so this is false for every constructed index.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimensionality shared by every stored vector.
    fn dim(&self) -> usize;

    /// Exact top-k query, ascending by distance.
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Hit>>;
}

/// Brute-force flat index over squared Euclidean distance.
#[derive(Debug)]
pub struct FlatL2Index {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    /// Build an index from an ordered vector set.
    ///
    /// Insertion order defines position; position doubles as the chunk
    /// id for indexes built from a chunk sequence.
    ///
    /// # Errors
    ///
    /// - [`RetrievalError::EmptyInput`] if `vectors` is empty — an
    ///   index must represent at least one vector, so callers
    ///   special-case zero-chunk documents before building.
    /// - [`RetrievalError::DimensionMismatch`] if any vector's length
    ///   differs from the first.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dim = match vectors.first() {
            Some(v) => v.len(),
            None => return Err(RetrievalError::EmptyInput),
        };
        for v in &vectors {
            if v.len() != dim {
                return Err(RetrievalError::DimensionMismatch {
                    expected: dim,
                    actual: v.len(),
                });
            }
        }
        Ok(Self { dim, vectors })
    }
}

impl IndexBackend for FlatL2Index {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dim(&self) -> usize {
        self.dim
    }

    /// Scan every stored vector and return the `top_k` closest,
    /// ascending by distance. Equal distances rank the lower stored
    /// position first so output is deterministic. `top_k` larger than
    /// the index is clamped, never an error.
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Hit>> {
        if query.len() != self.dim {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut hits: Vec<Hit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| Hit {
                position,
                distance: l2_squared(query, v),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });
        hits.truncate(top_k.min(self.vectors.len()));
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_empty_fails() {
        let err = FlatL2Index::build(Vec::new()).unwrap_err();
        assert!(matches!(err, RetrievalError::EmptyInput));
    }

    #[test]
    fn test_build_mismatched_dims_fails() {
        let err = FlatL2Index::build(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        match err {
            RetrievalError::DimensionMismatch { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_search_wrong_query_dims_fails() {
        let index = FlatL2Index::build(vec![vec![0.0, 0.0]]).unwrap();
        let err = index.search(&[1.0], 1).unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_search_ascending_by_distance() {
        let index = FlatL2Index::build(vec![
            vec![10.0, 0.0],
            vec![1.0, 0.0],
            vec![5.0, 0.0],
        ])
        .unwrap();
        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        let order: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(order, vec![1, 2, 0]);
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_equal_distances_rank_lower_position_first() {
        // Three identical vectors: all tie at the same distance.
        let index = FlatL2Index::build(vec![
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
        ])
        .unwrap();
        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        let order: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_top_k_clamped_to_index_size() {
        let index = FlatL2Index::build(vec![vec![1.0], vec![2.0]]).unwrap();
        let hits = index.search(&[0.0], 50).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_top_k_zero_returns_nothing() {
        let index = FlatL2Index::build(vec![vec![1.0]]).unwrap();
        assert!(index.search(&[0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_exact_vector_is_top_hit_with_zero_distance() {
        let index = FlatL2Index::build(vec![
            vec![0.3, 0.7],
            vec![-1.2, 4.5],
            vec![2.0, 2.0],
        ])
        .unwrap();
        let hits = index.search(&[-1.2, 4.5], 1).unwrap();
        assert_eq!(hits[0].position, 1);
        assert!(hits[0].distance.abs() < 1e-9);
    }

    #[test]
    fn test_len_and_dim() {
        let index = FlatL2Index::build(vec![vec![0.0; 4]; 7]).unwrap();
        assert_eq!(index.len(), 7);
        assert_eq!(index.dim(), 4);
        assert!(!index.is_empty());
    }
}
