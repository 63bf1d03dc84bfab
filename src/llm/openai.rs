// OpenAI-compatible chat completion client.
//
// Works against api.openai.com, Azure OpenAI gateways, and local servers
// that speak the same /chat/completions dialect. Wrapped behind the
// ChatCompleter trait so the pipeline never sees this type directly.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::traits::{ChatCompleter, ChatRequest};

/// Chat completion client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiClient {
    /// Create a client for the given base endpoint (e.g.
    /// `https://api.openai.com/v1`).
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ChatCompleter for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .context("Failed to call chat completion endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat completion endpoint returned {}: {}", status, body);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        let first = completion
            .choices
            .into_iter()
            .next()
            .context("Chat completion response contained no choices")?;

        debug!(
            model = %request.model,
            chars = first.message.content.len(),
            "Received completion"
        );

        Ok(first.message.content)
    }
}

// --- Chat completion response types ---

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}
