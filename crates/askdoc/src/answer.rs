//! Answer generation via the Cohere generate API.
//!
//! The last stage of the pipeline: the question plus the retrieved
//! chunk texts (ranked order, closest first) become a single prompt,
//! and the generation collaborator turns it into a natural-language
//! answer. Generation failing does not invalidate retrieval — callers
//! still surface the ranked chunks alongside the error.
//!
//! The API key is supplied per request rather than read from the
//! environment: the original service took it as a form field, and the
//! HTTP surface preserves that shape.

use std::time::Duration;

use crate::config::GenerationConfig;

/// Generation failure. Retrieval results remain valid when this is
/// returned.
#[derive(Debug)]
pub enum AnswerError {
    Disabled,
    Transport(String),
    Api { status: u16, message: String },
    MalformedResponse(String),
}

impl std::fmt::Display for AnswerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerError::Disabled => write!(f, "answer generation is disabled"),
            AnswerError::Transport(e) => write!(f, "generation request failed: {}", e),
            AnswerError::Api { status, message } => {
                write!(f, "generation API error {}: {}", status, message)
            }
            AnswerError::MalformedResponse(e) => {
                write!(f, "malformed generation response: {}", e)
            }
        }
    }
}

impl std::error::Error for AnswerError {}

/// Builds the generation prompt from the question and the retrieved
/// chunk texts, ranked order preserved (closest match first).
pub fn build_prompt(query: &str, chunk_texts: &[String]) -> String {
    let context = chunk_texts.join(" ");
    format!(
        "Answer the question: {} using the document's relevant context: {}",
        query, context
    )
}

/// Generate an answer for `query` grounded in the retrieved chunks.
pub async fn generate_answer(
    config: &GenerationConfig,
    api_key: &str,
    query: &str,
    chunk_texts: &[String],
) -> Result<String, AnswerError> {
    match config.provider.as_str() {
        "cohere" => generate_cohere(config, api_key, query, chunk_texts).await,
        "disabled" => Err(AnswerError::Disabled),
        other => Err(AnswerError::Transport(format!(
            "unknown generation provider: {}",
            other
        ))),
    }
}

/// Call the Cohere generate endpoint with a bounded timeout.
async fn generate_cohere(
    config: &GenerationConfig,
    api_key: &str,
    query: &str,
    chunk_texts: &[String],
) -> Result<String, AnswerError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AnswerError::Transport(e.to_string()))?;

    let mut body = serde_json::json!({
        "prompt": build_prompt(query, chunk_texts),
    });
    if let Some(model) = &config.model {
        body["model"] = serde_json::Value::String(model.clone());
    }

    let response = client
        .post("https://api.cohere.com/v1/generate")
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| AnswerError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(AnswerError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let json: serde_json::Value = response
        .json()
        .await
        .map_err(|e| AnswerError::MalformedResponse(e.to_string()))?;
    parse_generations(&json)
}

/// Extract the first generation's text from a Cohere response body.
fn parse_generations(json: &serde_json::Value) -> Result<String, AnswerError> {
    json.get("generations")
        .and_then(|g| g.as_array())
        .and_then(|g| g.first())
        .and_then(|g| g.get("text"))
        .and_then(|t| t.as_str())
        .map(|t| t.trim().to_string())
        .ok_or_else(|| {
            AnswerError::MalformedResponse("missing generations[0].text".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_query_and_ranked_context() {
        let prompt = build_prompt(
            "What did the dog do?",
            &[" The dog ran".to_string(), "The cat sat.".to_string()],
        );
        assert_eq!(
            prompt,
            "Answer the question: What did the dog do? using the document's relevant context:  The dog ran The cat sat."
        );
    }

    #[test]
    fn test_prompt_with_no_chunks() {
        let prompt = build_prompt("anything", &[]);
        assert!(prompt.ends_with("relevant context: "));
    }

    #[test]
    fn test_parse_generations() {
        let json = serde_json::json!({
            "generations": [ { "text": " The dog ran.\n" } ]
        });
        assert_eq!(parse_generations(&json).unwrap(), "The dog ran.");
    }

    #[test]
    fn test_parse_generations_missing_fails() {
        let json = serde_json::json!({ "generations": [] });
        assert!(matches!(
            parse_generations(&json).unwrap_err(),
            AnswerError::MalformedResponse(_)
        ));
    }
}
