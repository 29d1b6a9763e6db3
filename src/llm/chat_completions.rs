//! OpenAI Chat Completions API client.
//!
//! This module implements [`CompletionClient`] for the OpenAI Chat Completions
//! API (`/v1/chat/completions`) with a single non-streaming request per
//! prompt.

use std::time::Duration;

use anyhow::Context as _;
use uuid::Uuid;

use super::provider::AuthScheme;
use super::{CompletionClient, LlmSettings, Message};

/// Client for the OpenAI Chat Completions API.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("base_url", &self.settings.base_url)
            .field("model", &self.settings.model)
            .field("provider", &self.settings.provider)
            .finish()
    }
}

impl ChatCompletionsClient {
    /// Create a new Chat Completions client with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn url(&self) -> String {
        self.settings
            .provider
            .build_chat_url(&self.settings.base_url, &self.settings.model)
    }
}

#[async_trait::async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, prompt: &str, timeout: Duration) -> anyhow::Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let body = serde_json::json!({
            "model": self.settings.model,
            "stream": false,
            "messages": [Message::user(prompt)],
        });

        tracing::debug!(
            request_id = %request_id,
            prompt_length = prompt.len(),
            timeout_secs = timeout.as_secs(),
            "Starting completion"
        );

        let mut rb = self.http.post(self.url()).timeout(timeout).json(&body);
        if let Some(k) = &self.settings.api_key {
            rb = match self.settings.provider.auth_scheme() {
                AuthScheme::ApiKeyHeader => rb.header("api-key", k),
                AuthScheme::Bearer => rb.bearer_auth(k),
            };
        }

        let resp = rb.send().await?.error_for_status()?;
        let v: serde_json::Value = resp.json().await?;
        let content = v["choices"][0]["message"]["content"]
            .as_str()
            .context("completion response has no message content")?
            .to_string();

        tracing::debug!(
            request_id = %request_id,
            content_length = content.len(),
            "Completion finished"
        );
        Ok(content)
    }
}
