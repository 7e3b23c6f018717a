//! End-to-end retrieval for one (document, query) request.
//!
//! [`Retriever`] ties the pipeline together: chunk the document, embed
//! the chunk batch, build a flat index, embed the query, search. Every
//! entity it creates is request-scoped — chunks, vectors, and the index
//! are dropped when the result is returned, and nothing is cached
//! across requests. Independent requests may therefore run concurrently
//! with no shared mutable state.

use serde::Serialize;

use crate::chunk::{chunk_text, Chunk};
use crate::embedding::{embed_one, Embedder};
use crate::error::{Result, RetrievalError};
use crate::index::{FlatL2Index, IndexBackend};

/// A retrieved chunk and its distance to the query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Squared L2 distance to the query; smaller = more relevant.
    pub distance: f32,
}

/// Chunking configuration for the retrieval pipeline.
///
/// Holds the two window constants; the embedding model is passed into
/// [`process`](Retriever::process) by reference rather than held here,
/// so one process-wide provider can serve many concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct Retriever {
    chunk_size: usize,
    stride: usize,
}

impl Retriever {
    /// Create a retriever with the given window constants.
    pub fn new(chunk_size: usize, stride: usize) -> Self {
        Self { chunk_size, stride }
    }

    /// Run the full pipeline for one (document, query) pair.
    ///
    /// Makes exactly two embedding calls: one batch call covering every
    /// chunk, then one call for the query. Results come back ascending
    /// by distance, at most `top_k` of them.
    ///
    /// # Errors
    ///
    /// - [`RetrievalError::EmptyDocument`] if the document yields no
    ///   chunks; the embedder is never called in that case.
    /// - [`RetrievalError::EmbeddingFailure`] if the embedder errors or
    ///   returns a different number of vectors than chunks.
    /// - [`RetrievalError::DimensionMismatch`] if the embedder's output
    ///   is internally inconsistent — a configuration bug, not a user
    ///   error.
    pub async fn process(
        &self,
        document_text: &str,
        query_text: &str,
        top_k: usize,
        embedder: &dyn Embedder,
    ) -> Result<Vec<ScoredChunk>> {
        let chunks = chunk_text(document_text, self.chunk_size, self.stride);
        if chunks.is_empty() {
            return Err(RetrievalError::EmptyDocument);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(RetrievalError::EmbeddingFailure(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let index = FlatL2Index::build(vectors)?;
        let query_vec = embed_one(embedder, query_text).await?;
        let hits = index.search(&query_vec, top_k)?;

        Ok(hits
            .into_iter()
            .map(|hit| ScoredChunk {
                chunk: chunks[hit.position].clone(),
                distance: hit.distance,
            })
            .collect())
    }
}
