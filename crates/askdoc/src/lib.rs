//! # askdoc
//!
//! Ask natural-language questions about a single document. One request
//! uploads a document and a question; askdoc extracts the text, splits
//! it into character windows, embeds each window, ranks them against
//! the question's embedding by exact L2 distance, and forwards the
//! closest passages to a text-generation service for the final answer.
//!
//! ## Architecture
//!
//! ```text
//! document ──▶ extract ──▶ chunk ──▶ embed (batch) ──▶ FlatL2Index
//!                                                          │
//! query ─────────────────▶ embed ─────────────────────▶ search
//!                                                          │
//!                                  ranked chunks ──▶ generate answer
//! ```
//!
//! The retrieval core (chunker, index, retriever) lives in the
//! `askdoc-core` crate; this crate supplies the collaborators at its
//! seams — PDF extraction, embedding providers, answer generation —
//! plus the CLI and HTTP surfaces. Everything is request-scoped: no
//! index survives a request, and nothing is cached across requests.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`extract`] | PDF / plain-text extraction |
//! | [`embedding`] | Concrete embedding providers |
//! | [`answer`] | Answer generation (Cohere) |
//! | [`ask`] | CLI command implementations |
//! | [`server`] | JSON HTTP server |

pub mod answer;
pub mod ask;
pub mod config;
pub mod embedding;
pub mod extract;
pub mod server;
