//! Ollama-style local model server adapter
//!
//! Speaks both wire shapes of an Ollama-compatible server: the single-turn
//! completion endpoint and the chat endpoint. Responses come back as JSON
//! whose text payload location varies, so extraction goes through the shared
//! field-priority lookup.

use super::config::ProviderConfig;
use super::errors::ProviderError;
use super::provider::ModelProvider;
use super::timeout::adaptive_timeout;
use super::types::{CompletionOptions, Message, ProviderResult, TaskKind};
use crate::response::extract_all_text_content;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Adapter for a local or remote Ollama-compatible server
pub struct OllamaProvider {
    client: Client,
    name: String,
    base_url: String,
    model: String,
    min_timeout: Duration,
    use_chat: bool,
    options: CompletionOptions,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: &'a CompletionOptions,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: &'a CompletionOptions,
}

impl OllamaProvider {
    /// Create an adapter from one provider config table
    pub fn new(name: &str, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ProviderError::config(format!("HTTP client construction failed: {e}")))?;

        Ok(Self {
            client,
            name: name.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            min_timeout: Duration::from_secs(config.timeout_secs),
            use_chat: config.use_chat,
            options: options_from_extra(config),
        })
    }

    /// Single-turn completion call (`/api/generate`)
    pub async fn complete(
        &self,
        prompt: &str,
        deadline: Duration,
    ) -> Result<ProviderResult, ProviderError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: &self.options,
        };
        let url = format!("{}/api/generate", self.base_url);
        self.send(&url, &request, deadline).await
    }

    /// Chat call (`/api/chat`)
    pub async fn chat(
        &self,
        messages: &[Message],
        deadline: Duration,
    ) -> Result<ProviderResult, ProviderError> {
        let request =
            ChatRequest { model: &self.model, messages, stream: false, options: &self.options };
        let url = format!("{}/api/chat", self.base_url);
        self.send(&url, &request, deadline).await
    }

    async fn send<T: Serialize>(
        &self,
        url: &str,
        request: &T,
        deadline: Duration,
    ) -> Result<ProviderResult, ProviderError> {
        debug!(provider = %self.name, %url, "sending request");

        let response = self
            .client
            .post(url)
            .timeout(deadline)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(&self.name, deadline, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(provider = %self.name, %status, body = %body, "request failed");
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(ProviderError::from_status(&self.name, &self.model, status.as_u16(), message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::bad_response(&self.name, e.to_string()))?;

        if let Some(error) = body.get("error") {
            let message = error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string());
            return Err(ProviderError::bad_response(&self.name, message));
        }

        let text = extract_all_text_content(&body).ok_or_else(|| {
            ProviderError::bad_response(&self.name, "no text content in response body")
        })?;

        Ok(ProviderResult::ok(&self.name, &self.model, text))
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).timeout(Duration::from_secs(2)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn request_timeout(&self, prompt: &str, task: TaskKind) -> Duration {
        adaptive_timeout(prompt.len(), task).max(self.min_timeout)
    }

    async fn generate(
        &self,
        prompt: &str,
        task: TaskKind,
    ) -> Result<ProviderResult, ProviderError> {
        let deadline = self.request_timeout(prompt, task);
        if self.use_chat {
            let messages = [Message::user(prompt)];
            self.chat(&messages, deadline).await
        } else {
            self.complete(prompt, deadline).await
        }
    }
}

/// Sampling options from the provider's `extra` table, defaults elsewhere
fn options_from_extra(config: &ProviderConfig) -> CompletionOptions {
    let mut options = CompletionOptions::default();
    if let Some(value) = config.extra.get("temperature").and_then(toml::Value::as_float) {
        options.temperature = Some(value as f32);
    }
    if let Some(value) = config.extra.get("num_predict").and_then(toml::Value::as_integer) {
        options.num_predict = Some(value.max(0) as usize);
    }
    if let Some(value) = config.extra.get("top_p").and_then(toml::Value::as_float) {
        options.top_p = Some(value as f32);
    }
    if let Some(value) = config.extra.get("top_k").and_then(toml::Value::as_integer) {
        options.top_k = Some(value.max(0) as u32);
    }
    options
}
