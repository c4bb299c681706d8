use crate::config::CompletionConfig;
use crate::error::{PipelineError, PipelineResult};
use ::config::ConfigError;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

/// Default chat-completions host (Groq's OpenAI-compatible endpoint).
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.groq.com/openai";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Single-shot chat client for the completion service.
///
/// Exactly one call per request: no retry, no backoff.
pub struct CompletionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionClient {
    /// Builds a client from configuration resolved at startup. The API key
    /// comes from config or the conventional environment variable; pipeline
    /// code never reads the environment itself.
    pub fn new(config: &CompletionConfig) -> Result<Self, ConfigError> {
        Ok(CompletionClient {
            client: Client::new(),
            api_key: config.resolve_api_key()?,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Sends one single-turn user message and returns the first choice's text
    /// verbatim.
    pub async fn complete(&self, prompt: &str) -> PipelineResult<String> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let response_body: Value = response.json().await?;
        debug!("completion response: {response_body:?}");

        response_body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| {
                PipelineError::response_format("completion body had no choices[0].message.content")
            })
    }
}
