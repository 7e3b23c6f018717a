//! Typed failure taxonomy for the retrieval pipeline.
//!
//! Every failure is a distinct variant so callers can branch on kind
//! without inspecting message text. [`RetrievalError::DimensionMismatch`]
//! indicates a configuration bug (embedding output disagreeing with the
//! index); the application layer logs it separately from user-input
//! conditions. Retrieval never partially succeeds: a request produces
//! either a complete ranked result or one of these errors.

use thiserror::Error;

/// Errors produced by the chunking, indexing, and retrieval pipeline.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The document produced no chunks; there is nothing to search.
    #[error("document produced no chunks; nothing to search")]
    EmptyDocument,

    /// An index must represent at least one vector.
    #[error("cannot build an index from an empty vector set")]
    EmptyInput,

    /// Two vectors (or a query and the index) disagree on dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality the index was built with.
        expected: usize,
        /// Dimensionality actually received.
        actual: usize,
    },

    /// The embedding collaborator failed, timed out, or returned a
    /// malformed batch. Not retried internally; callers may retry.
    #[error("embedding failed: {0}")]
    EmbeddingFailure(String),
}

/// Convenience result alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;
