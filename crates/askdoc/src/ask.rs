//! One-shot CLI commands: inspect chunking, ask a question.

use anyhow::{Context, Result};
use std::path::Path;

use askdoc_core::chunk::chunk_text;
use askdoc_core::retrieve::Retriever;

use crate::answer::generate_answer;
use crate::config::Config;
use crate::embedding::create_provider;
use crate::extract::extract_file;

/// Shorten chunk text to a single display line.
fn preview(text: &str) -> String {
    let flat: String = text.chars().take(72).collect();
    let flat = flat.replace(['\n', '\r'], " ");
    if text.chars().count() > 72 {
        format!("{}…", flat)
    } else {
        flat
    }
}

/// `askdoc chunk <file>` — show how a document would be chunked
/// without calling the embedding provider.
pub fn run_chunk(cfg: &Config, path: &Path) -> Result<()> {
    let text = extract_file(path)
        .with_context(|| format!("could not extract text from {}", path.display()))?;

    let chunks = chunk_text(&text, cfg.chunking.chunk_size, cfg.chunking.stride);
    println!(
        "chunks: {} (chunk_size={}, stride={})",
        chunks.len(),
        cfg.chunking.chunk_size,
        cfg.chunking.stride
    );
    for c in &chunks {
        println!("{:>4}  @{:<8} {}", c.id, c.start_offset, preview(&c.text));
    }
    Ok(())
}

/// `askdoc ask <file> <query>` — run the full pipeline and print the
/// ranked chunks, then the generated answer if an API key is available.
pub async fn run_ask(
    cfg: &Config,
    path: &Path,
    query: &str,
    top_k: Option<usize>,
    api_key: Option<String>,
) -> Result<()> {
    let text = extract_file(path)
        .with_context(|| format!("could not extract text from {}", path.display()))?;

    let provider = create_provider(&cfg.embedding)?;
    let retriever = Retriever::new(cfg.chunking.chunk_size, cfg.chunking.stride);
    let top_k = top_k.unwrap_or(cfg.retrieval.top_k);

    let results = retriever
        .process(&text, query, top_k, provider.as_ref())
        .await?;

    println!("Top {} chunks:", results.len());
    for (rank, scored) in results.iter().enumerate() {
        println!(
            "{}. (distance {:.4}) {}",
            rank + 1,
            scored.distance,
            preview(&scored.chunk.text)
        );
    }

    let api_key = api_key.or_else(|| std::env::var("COHERE_API_KEY").ok());
    let Some(api_key) = api_key else {
        println!("\nNo API key provided (--api-key or COHERE_API_KEY); skipping answer generation.");
        return Ok(());
    };

    let chunk_texts: Vec<String> = results.iter().map(|s| s.chunk.text.clone()).collect();
    match generate_answer(&cfg.generation, &api_key, query, &chunk_texts).await {
        Ok(answer) => {
            println!("\nAnswer:\n{}", answer);
        }
        Err(e) => {
            // Retrieval succeeded; the ranked chunks above stand even
            // though generation failed.
            tracing::warn!(error = %e, "answer generation failed");
            eprintln!("\nAnswer generation failed: {}", e);
        }
    }

    Ok(())
}
