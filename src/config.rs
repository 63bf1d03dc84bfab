use std::env;

use anyhow::Result;

/// Default OpenAI-compatible endpoint. Azure deployments and local gateways
/// override this via LLM_ENDPOINT.
pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1";

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Base URL of the chat completion service
    pub llm_endpoint: String,
    pub llm_api_key: String,
    /// Model used for topic interpretation and question answering
    pub llm_model: String,
    /// Cheaper model used for per-chat summaries
    pub summary_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the API key, which is only required
    /// for operations that actually reach the LLM (see `require_llm`).
    pub fn load() -> Result<Self> {
        Ok(Self {
            llm_endpoint: env::var("LLM_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_LLM_ENDPOINT.to_string()),
            llm_api_key: env::var("LLM_KEY").unwrap_or_default(),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4.1".to_string()),
            summary_model: env::var("LLM_SUMMARY_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        })
    }

    /// Check that the LLM API key is configured.
    /// Call this before any operation that needs theme interpretation,
    /// summaries, or question answering.
    pub fn require_llm(&self) -> Result<()> {
        if self.llm_api_key.is_empty() {
            anyhow::bail!(
                "LLM_KEY not set. Add it to your .env file.\n\
                 Raw topic modeling still works without it: pass --raw."
            );
        }
        Ok(())
    }
}
