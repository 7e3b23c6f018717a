//! # askdoc-core
//!
//! Retrieval logic for askdoc: splitting one document into character
//! windows, indexing their embedding vectors for exact nearest-neighbor
//! search, and returning the top-k closest chunks to a query.
//!
//! This crate contains no I/O, no HTTP, and no runtime dependency.
//! Concrete embedding and answer-generation providers live in the
//! `askdoc` app crate and are passed in through the
//! [`embedding::Embedder`] trait.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chunk`] | Fixed-window text chunking |
//! | [`embedding`] | Embedder trait and distance helpers |
//! | [`index`] | Brute-force flat L2 vector index |
//! | [`retrieve`] | Per-request pipeline orchestration |
//! | [`error`] | Typed failure taxonomy |

pub mod chunk;
pub mod embedding;
pub mod error;
pub mod index;
pub mod retrieve;
