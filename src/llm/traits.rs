// Chat completion trait — the swap-ready abstraction over LLM providers.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One role-tagged message in a chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A chat completion request. Mirrors the OpenAI wire shape; other providers
/// adapt it inside their ChatCompleter implementation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    /// The pipeline only uses the non-streaming form
    pub stream: bool,
}

/// Trait for chat completion providers. Implementations must be async
/// because providers sit behind HTTP APIs.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Send one completion request and return the first choice's text.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

/// No-op completer for statistical-only runs. Bails if actually called, so
/// raw topic modeling can't silently depend on a live LLM.
pub struct NoopCompleter;

#[async_trait]
impl ChatCompleter for NoopCompleter {
    async fn complete(&self, _request: &ChatRequest) -> Result<String> {
        anyhow::bail!("NoopCompleter should never be called. Interpretation needs a configured LLM.")
    }
}
