//! OpenAI-compatible remote provider
//!
//! Many hosted services expose the same chat-completions wire shape with
//! different base URLs; one adapter covers them all. The API key comes from
//! an environment variable named in configuration, never from the config
//! file itself.

use super::config::ProviderConfig;
use super::errors::ProviderError;
use super::provider::ModelProvider;
use super::timeout::adaptive_timeout;
use super::types::{Message, ProviderResult, TaskKind};
use crate::response::extract_all_text_content;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Adapter for OpenAI-compatible chat endpoints
pub struct OpenAiCompatProvider {
    client: Client,
    name: String,
    base_url: String,
    model: String,
    api_key_env: String,
    min_timeout: Duration,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: usize,
}

impl OpenAiCompatProvider {
    /// Create an adapter from one provider config table
    pub fn new(name: &str, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key_env = config.api_key_env.clone().ok_or_else(|| {
            ProviderError::config(format!("provider '{name}' requires api_key_env"))
        })?;

        let client = Client::builder()
            .build()
            .map_err(|e| ProviderError::config(format!("HTTP client construction failed: {e}")))?;

        let temperature = config
            .extra
            .get("temperature")
            .and_then(toml::Value::as_float)
            .map(|t| t as f32)
            .unwrap_or(0.2);
        let max_tokens = config
            .extra
            .get("max_tokens")
            .and_then(toml::Value::as_integer)
            .map(|t| t.max(1) as usize)
            .unwrap_or(4096);

        Ok(Self {
            client,
            name: name.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key_env,
            min_timeout: Duration::from_secs(config.timeout_secs),
            temperature,
            max_tokens,
        })
    }

    fn api_key(&self) -> Result<String, ProviderError> {
        std::env::var(&self.api_key_env).map_err(|_| {
            ProviderError::auth(&self.name, format!("{} is not set", self.api_key_env))
        })
    }

    async fn chat_completion(
        &self,
        messages: &[Message],
        deadline: Duration,
    ) -> Result<ProviderResult, ProviderError> {
        let api_key = self.api_key()?;
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(provider = %self.name, %url, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .timeout(deadline)
            .bearer_auth(api_key)
            .json(&request)
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

        let text = extract_all_text_content(&body).ok_or_else(|| {
            ProviderError::bad_response(&self.name, "no text content in response body")
        })?;

        Ok(ProviderResult::ok(&self.name, &self.model, text))
    }
}

#[async_trait]
impl ModelProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        std::env::var(&self.api_key_env).is_ok()
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
        let messages = [
            Message::system("You are an expert Python developer. Return working code."),
            Message::user(prompt),
        ];
        self.chat_completion(&messages, deadline).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::config::ProviderKind;
    use std::collections::HashMap;

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            kind: ProviderKind::OpenaiCompat,
            priority: 2,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-70b-8192".to_string(),
            timeout_secs: 30,
            api_key_env: Some("SPYQ_TEST_MISSING_KEY".to_string()),
            use_chat: true,
            extra: HashMap::new(),
        }
    }

    #[test]
    fn test_requires_api_key_env() {
        let mut config = test_config();
        config.api_key_env = None;
        assert!(matches!(
            OpenAiCompatProvider::new("remote", &config),
            Err(ProviderError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_unavailable_without_key() {
        let provider = OpenAiCompatProvider::new("remote", &test_config()).unwrap();
        assert!(!provider.is_available().await);
    }

    #[tokio::test]
    async fn test_missing_key_is_auth_error() {
        let provider = OpenAiCompatProvider::new("remote", &test_config()).unwrap();
        let result = provider.generate("prompt", TaskKind::Plain).await;
        assert!(matches!(result, Err(ProviderError::Auth { .. })));
    }
}
