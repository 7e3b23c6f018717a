//! Embedding capability trait and distance helpers.
//!
//! [`Embedder`] is the seam between retrieval and whatever model turns
//! text into vectors. The core depends only on its contract: a
//! deterministic dimensionality, order-preserving batch output, and a
//! bounded call (concrete providers enforce their own timeout and
//! surface it as [`RetrievalError::EmbeddingFailure`]).
//!
//! Concrete providers (OpenAI, disabled) live in the `askdoc` app
//! crate.

use async_trait::async_trait;

use crate::error::{Result, RetrievalError};

/// Trait for embedding providers.
///
/// Implementations are created by the application and passed into the
/// retriever by reference for the duration of one request.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the model identifier (e.g. `"all-MiniLM-L6-v2"`).
    fn model_name(&self) -> &str;

    /// Returns the embedding vector dimensionality (e.g. `384`).
    fn dims(&self) -> usize;

    /// Embed a batch of texts.
    ///
    /// Returns one vector per input text, in input order, each of
    /// [`dims`](Embedder::dims) length.
    ///
    /// # Errors
    ///
    /// [`RetrievalError::EmbeddingFailure`] on transport errors,
    /// timeouts, or a malformed model response.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Embed a single query text.
///
/// Convenience wrapper around [`Embedder::embed`] for single-text use
/// cases (e.g. embedding a search query).
pub async fn embed_one(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>> {
    let mut vectors = embedder.embed(&[text.to_string()]).await?;
    if vectors.len() != 1 {
        return Err(RetrievalError::EmbeddingFailure(format!(
            "expected 1 vector for a single text, got {}",
            vectors.len()
        )));
    }
    vectors
        .pop()
        .ok_or_else(|| RetrievalError::EmbeddingFailure("empty embedding response".to_string()))
}

/// Squared Euclidean (L2) distance between two equal-length vectors.
///
/// Smaller = more similar. Rankings under squared L2 are identical to
/// rankings under plain L2, so the square root is never taken.
///
/// Callers are responsible for checking lengths; the index validates
/// dimensionality before computing distances.
pub fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_identical_is_zero() {
        let v = vec![1.0, -2.5, 3.125];
        assert_eq!(l2_squared(&v, &v), 0.0);
    }

    #[test]
    fn test_l2_known_distance() {
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        assert!((l2_squared(&a, &b) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_l2_symmetric() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![-1.0, 0.5, 2.0];
        assert_eq!(l2_squared(&a, &b), l2_squared(&b, &a));
    }

    #[test]
    fn test_l2_empty_is_zero() {
        assert_eq!(l2_squared(&[], &[]), 0.0);
    }
}
