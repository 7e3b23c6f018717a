//! Fixed-window text chunker.
//!
//! Splits a document into windows of up to `chunk_size` characters,
//! advancing `stride` characters between window starts. With
//! `stride < chunk_size` consecutive chunks overlap; with
//! `stride > chunk_size` the windows leave gaps. Both configurations
//! are valid: the default (300-character chunks every 512 characters)
//! reproduces the behavior of the service this crate was extracted
//! from, and callers that want contiguous coverage set
//! `stride <= chunk_size`.
//!
//! Chunking is a pure function of its inputs. Chunk ids are positional
//! (`0..n-1` in output order) and double as vector positions in the
//! index built from the same chunk sequence.

use serde::Serialize;

/// A bounded substring of the source document — the unit of retrieval.
///
/// Created once per document request and never mutated. The `id` is
/// stable for the life of one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Positional id, assigned at creation starting at 0.
    pub id: usize,
    /// The chunk text (a character window of the document).
    pub text: String,
    /// Character offset of the window start within the document.
    pub start_offset: usize,
}

/// Split `text` into character windows.
///
/// Walks the document at `stride`-character steps and takes up to
/// `chunk_size` characters at each step; the final chunk may be
/// shorter if fewer characters remain. Offsets and window lengths are
/// counted in characters, never bytes, so multi-byte input is sliced
/// safely.
///
/// Returns an empty vector for empty input — downstream components
/// treat an empty chunk sequence as "nothing to search".
///
/// # Panics
///
/// Panics if `chunk_size` or `stride` is zero. Both values come from
/// validated configuration (see the app crate's `config` module).
pub fn chunk_text(text: &str, chunk_size: usize, stride: usize) -> Vec<Chunk> {
    assert!(chunk_size > 0, "chunk_size must be > 0");
    assert!(stride > 0, "stride must be > 0");

    if text.is_empty() {
        return Vec::new();
    }

    // Byte index of every character plus an end sentinel, so windows
    // can be sliced without re-scanning the string per chunk.
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());
    let n_chars = boundaries.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < n_chars {
        let end = (start + chunk_size).min(n_chars);
        chunks.push(Chunk {
            id: chunks.len(),
            text: text[boundaries[start]..boundaries[end]].to_string(),
            start_offset: start,
        });
        start += stride;
    }
    chunks
}
