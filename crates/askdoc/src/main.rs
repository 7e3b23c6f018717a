//! # askdoc CLI
//!
//! The `askdoc` binary answers questions about a single document from
//! the command line or over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! askdoc --config ./config/askdoc.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `askdoc chunk <file>` | Show how a document would be chunked |
//! | `askdoc ask <file> "<query>"` | Retrieve relevant chunks and generate an answer |
//! | `askdoc serve` | Start the JSON HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Inspect chunking without calling any provider
//! askdoc chunk report.pdf
//!
//! # Full pipeline: ranked chunks plus a generated answer
//! askdoc ask report.pdf "What were the Q3 findings?" --top-k 3
//!
//! # Serve POST /ask
//! askdoc serve --config ./config/askdoc.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use askdoc::{ask, config, server};

/// askdoc — retrieval-augmented question answering over one document.
#[derive(Parser)]
#[command(
    name = "askdoc",
    about = "Ask natural-language questions about a single document",
    version,
    long_about = "askdoc splits an uploaded document into character windows, embeds them, \
    ranks them against the question by exact L2 distance, and forwards the closest passages \
    to a text-generation service for the final answer."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults are used when the file does not exist. See
    /// `config/askdoc.example.toml` for a full example.
    #[arg(long, global = true, default_value = "./config/askdoc.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Show how a document would be chunked.
    ///
    /// Extracts the document text and prints every chunk with its id
    /// and character offset. No embedding provider is contacted, so
    /// this works without any API keys.
    Chunk {
        /// Path to the document (.pdf, .txt, or .md).
        file: PathBuf,
    },

    /// Answer a question about a document.
    ///
    /// Runs the full pipeline: extract, chunk, embed, rank by L2
    /// distance, then generate an answer from the closest chunks.
    /// Requires an embedding provider in the config; answer generation
    /// additionally needs a Cohere API key.
    Ask {
        /// Path to the document (.pdf, .txt, or .md).
        file: PathBuf,

        /// The question to answer.
        query: String,

        /// Number of chunks to retrieve (defaults to `[retrieval].top_k`).
        #[arg(long)]
        top_k: Option<usize>,

        /// Generation API key (falls back to the COHERE_API_KEY
        /// environment variable; without either, only ranked chunks
        /// are printed).
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Start the JSON HTTP server.
    ///
    /// Serves `POST /ask` and `GET /health` on the address configured
    /// in `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        config::Config::default()
    };

    match cli.command {
        Commands::Chunk { file } => {
            ask::run_chunk(&cfg, &file)?;
        }
        Commands::Ask {
            file,
            query,
            top_k,
            api_key,
        } => {
            ask::run_ask(&cfg, &file, &query, top_k, api_key).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
