//! Text-generation client.
//!
//! Generation is an opaque black box: given a prompt string, return
//! generated text. The HTTP implementation targets an Ollama-style
//! `/api/generate` endpoint; anything satisfying [`TextGenerator`] works,
//! which is what the tests rely on.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// Errors from the generation backend.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse generation response: {0}")]
    Parse(String),
}

/// Opaque prompt-in, text-out generation call.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Client for an Ollama-compatible generation endpoint.
pub struct HttpGenerator {
    client: Client,
    base_url: String,
    model: String,
}

impl HttpGenerator {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);

        // Deterministic decoding: study guides should be reproducible for
        // the same retrieved context.
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": 0.0,
            },
        });

        debug!(url = %url, model = %self.model, "Generation request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        let text = resp["response"]
            .as_str()
            .ok_or_else(|| GenerationError::Parse("missing response field".into()))?
            .to_string();

        Ok(text)
    }
}
