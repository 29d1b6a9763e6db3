//! LLM completion client.
//!
//! The `/ask` backend needs exactly one capability from a model: turn a
//! prompt into text within a deadline. [`CompletionClient`] captures that;
//! [`ChatCompletionsClient`] implements it against any OpenAI-compatible
//! `/v1/chat/completions` endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use laru_chat::llm::{ChatCompletionsClient, LlmSettings, Provider};
//!
//! let settings = LlmSettings {
//!     base_url: "https://api.openai.com".to_string(),
//!     api_key: Some("sk-...".to_string()),
//!     model: "gpt-4o-mini".to_string(),
//!     provider: Provider::OpenAI,
//! };
//! let client = ChatCompletionsClient::new(settings);
//! ```

pub mod chat_completions;
pub mod provider;

use std::time::Duration;

pub use chat_completions::ChatCompletionsClient;
pub use provider::Provider;

/// LLM connection and model settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g., `https://api.openai.com`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier (e.g., `gpt-4o-mini`).
    pub model: String,
    /// Provider type (auto-detected from `base_url` if not specified).
    pub provider: Provider,
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt.
    System,
    /// User message.
    User,
    /// Assistant response.
    Assistant,
}

/// A message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Single-shot text completion.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete `prompt`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out or the response has
    /// no text.
    async fn complete(&self, prompt: &str, timeout: Duration) -> anyhow::Result<String>;
}
