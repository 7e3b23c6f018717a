//! JSON HTTP surface for document question answering.
//!
//! One request carries one document and one question; all retrieval
//! state is scoped to the request and dropped once the response is
//! written, so concurrent requests share nothing mutable.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/ask` | Answer a question about an uploaded document |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Error responses share one shape:
//!
//! ```json
//! { "error": { "code": "empty_document", "message": "…" } }
//! ```
//!
//! Codes: `bad_request` (400), `extraction_failed` (400),
//! `empty_document` (400), `embeddings_disabled` (400),
//! `embedding_failed` (502), `internal` (500).
//!
//! A generation failure is not an error response: retrieval succeeded,
//! so the ranked chunks are returned with an `error` detail in place
//! of the answer.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use askdoc_core::error::RetrievalError;
use askdoc_core::retrieve::Retriever;

use crate::answer::{generate_answer, AnswerError};
use crate::config::Config;
use crate::embedding::create_provider;
use crate::extract::{extract_text, MIME_PDF};

/// Shared application state passed to route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Starts the HTTP server.
///
/// Binds to the address configured in `[server].bind` and serves until
/// the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/ask", post(handle_ask))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("askdoc server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Machine-readable error code plus human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(code: &str, message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: code.to_string(),
        message: message.into(),
    }
}

fn internal_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Maps a retrieval failure to an HTTP error.
///
/// `DimensionMismatch` and `EmptyInput` mean the embedding output
/// disagreed with the index — a configuration bug, logged at error
/// level and reported as a 500. The other variants are request-level
/// conditions.
fn classify_retrieval_error(err: RetrievalError) -> AppError {
    match err {
        RetrievalError::EmptyDocument => bad_request("empty_document", err.to_string()),
        RetrievalError::EmbeddingFailure(_) => AppError {
            status: StatusCode::BAD_GATEWAY,
            code: "embedding_failed".to_string(),
            message: err.to_string(),
        },
        RetrievalError::DimensionMismatch { .. } | RetrievalError::EmptyInput => {
            tracing::error!(error = %err, "retrieval invariant violated; check embedding.dims");
            internal_error(err.to_string())
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /ask ============

/// Request body for `POST /ask`.
#[derive(Deserialize)]
struct AskRequest {
    /// Generation API key. Without it, only ranked chunks are returned.
    api_key: Option<String>,
    /// Base64-encoded document bytes.
    document: String,
    /// Document content type; defaults to PDF.
    #[serde(default = "default_content_type")]
    content_type: String,
    /// The question to answer.
    query: String,
    /// Number of chunks to retrieve; defaults to `[retrieval].top_k`.
    top_k: Option<usize>,
}

fn default_content_type() -> String {
    MIME_PDF.to_string()
}

/// One ranked chunk in the response, closest match first.
#[derive(Serialize)]
struct RankedChunk {
    id: usize,
    text: String,
    start_offset: usize,
    distance: f32,
}

/// Response body for `POST /ask`.
#[derive(Serialize)]
struct AskResponse {
    chunks: Vec<RankedChunk>,
    answer: Option<String>,
    /// Present when generation failed after successful retrieval.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorDetail>,
}

/// Handler for `POST /ask`.
///
/// Decodes and extracts the document, runs the retrieval pipeline, and
/// — when an API key is supplied — generates an answer from the ranked
/// chunks.
async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    if req.query.trim().is_empty() {
        return Err(bad_request("bad_request", "query must not be empty"));
    }

    let bytes = BASE64
        .decode(&req.document)
        .map_err(|e| bad_request("bad_request", format!("document is not valid base64: {}", e)))?;

    let text = extract_text(&bytes, &req.content_type)
        .map_err(|e| bad_request("extraction_failed", e.to_string()))?;

    if !state.config.embedding.is_enabled() {
        return Err(bad_request(
            "embeddings_disabled",
            "embedding provider is disabled; set [embedding].provider in the config",
        ));
    }
    let provider =
        create_provider(&state.config.embedding).map_err(|e| internal_error(e.to_string()))?;

    let retriever = Retriever::new(
        state.config.chunking.chunk_size,
        state.config.chunking.stride,
    );
    let top_k = req.top_k.unwrap_or(state.config.retrieval.top_k);

    let results = retriever
        .process(&text, &req.query, top_k, provider.as_ref())
        .await
        .map_err(classify_retrieval_error)?;

    let chunks: Vec<RankedChunk> = results
        .iter()
        .map(|s| RankedChunk {
            id: s.chunk.id,
            text: s.chunk.text.clone(),
            start_offset: s.chunk.start_offset,
            distance: s.distance,
        })
        .collect();

    let generation = match req.api_key {
        Some(api_key) => {
            let chunk_texts: Vec<String> = results.iter().map(|s| s.chunk.text.clone()).collect();
            Some(generate_answer(&state.config.generation, &api_key, &req.query, &chunk_texts).await)
        }
        None => None,
    };

    Ok(Json(assemble_ask_response(chunks, generation)))
}

/// Builds the `POST /ask` response body from the ranked chunks and the
/// generation outcome (`None` when no API key was supplied).
///
/// Retrieval already succeeded by the time this runs, so a generation
/// failure never discards the chunks: they are returned with a
/// `generation_failed` detail in place of the answer.
fn assemble_ask_response(
    chunks: Vec<RankedChunk>,
    generation: Option<Result<String, AnswerError>>,
) -> AskResponse {
    match generation {
        None => AskResponse {
            chunks,
            answer: None,
            error: None,
        },
        Some(Ok(answer)) => AskResponse {
            chunks,
            answer: Some(answer),
            error: None,
        },
        Some(Err(e)) => {
            tracing::warn!(error = %e, "answer generation failed; returning chunks only");
            AskResponse {
                chunks,
                answer: None,
                error: Some(ErrorDetail {
                    code: "generation_failed".to_string(),
                    message: e.to_string(),
                }),
            }
        }
    }
}
