//! Provider fallback manager
//!
//! Holds the configured providers in attempt order and tries them one at a
//! time until one succeeds. Attempts are strictly sequential; the
//! deterministic "last error" in the exhaustion report depends on that, so
//! do not parallelize this loop.

use super::config::LlmConfig;
use super::errors::ProviderError;
use super::provider::ModelProvider;
use super::registry::build_provider;
use super::types::{ProviderResult, TaskKind};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tries configured providers in fallback order until one succeeds
pub struct ProviderManager {
    providers: Vec<Arc<dyn ModelProvider>>,
}

impl ProviderManager {
    /// Create an empty manager; providers are pushed explicitly
    pub fn new() -> Self {
        Self { providers: Vec::new() }
    }

    /// Build the provider set from configuration
    ///
    /// Disabled providers were already filtered by the config ordering;
    /// a provider whose adapter fails to construct is skipped with a
    /// warning and never counts as an attempt.
    pub fn from_config(config: &LlmConfig) -> Self {
        let mut manager = Self::new();
        for (name, provider_config) in config.ordered_providers() {
            match build_provider(&name, &provider_config) {
                Ok(provider) => manager.push_provider(provider),
                Err(e) => warn!("skipping provider '{}': {}", name, e),
            }
        }
        info!("configured {} providers: {:?}", manager.providers.len(), manager.provider_names());
        manager
    }

    /// Append a provider to the end of the fallback order
    pub fn push_provider(&mut self, provider: Arc<dyn ModelProvider>) {
        self.providers.push(provider);
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Try each provider in order and return the first success
    ///
    /// Every attempt runs under the provider's own adaptive timeout. On
    /// exhaustion the result embeds the last underlying error and the full
    /// ordered list of providers attempted.
    pub async fn get_response(&self, prompt: &str, task: TaskKind) -> ProviderResult {
        if self.providers.is_empty() {
            return ProviderResult::failed("no providers configured");
        }

        let mut attempted: Vec<String> = Vec::new();
        let mut last_error = String::new();

        for provider in &self.providers {
            let name = provider.name().to_string();

            // A conclusively dead backend is skipped without burning an attempt.
            if !provider.is_available().await {
                warn!(provider = %name, "provider unavailable, skipping");
                continue;
            }

            let deadline = provider.request_timeout(prompt, task);
            debug!(provider = %name, ?deadline, "attempting provider");

            let attempt = tokio::time::timeout(deadline, provider.generate(prompt, task)).await;
            match attempt {
                Ok(Ok(result)) if result.success => {
                    info!(provider = %name, attempts = attempted.len() + 1, "provider succeeded");
                    let mut result = result;
                    if !attempted.is_empty() {
                        result
                            .metadata
                            .insert("failed_attempts".to_string(), attempted.join(","));
                    }
                    result
                        .metadata
                        .insert("attempts".to_string(), (attempted.len() + 1).to_string());
                    return result;
                }
                Ok(Ok(result)) => {
                    last_error = result.error.unwrap_or_else(|| "unknown failure".to_string());
                    warn!(provider = %name, error = %last_error, "provider returned failure");
                }
                Ok(Err(e)) => {
                    last_error = e.to_string();
                    warn!(provider = %name, error = %last_error, "provider attempt failed");
                }
                Err(_) => {
                    last_error = ProviderError::timeout(&name, deadline).to_string();
                    warn!(provider = %name, error = %last_error, "provider attempt timed out");
                }
            }
            attempted.push(name);
        }

        if attempted.is_empty() {
            return ProviderResult::failed(format!(
                "no providers available ({} configured, all skipped)",
                self.providers.len()
            ));
        }

        let error = ProviderError::Exhausted { attempted, last_error };
        ProviderResult::failed(error.to_string())
    }
}

impl Default for ProviderManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockProvider;

    #[tokio::test]
    async fn test_no_providers_configured() {
        let manager = ProviderManager::new();
        let result = manager.get_response("prompt", TaskKind::Plain).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("no providers configured"));
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = MockProvider::named("a").with_response("text from a");
        let second = MockProvider::named("b").with_response("text from b");
        let second_handle = second.clone();

        let mut manager = ProviderManager::new();
        manager.push_provider(Arc::new(first));
        manager.push_provider(Arc::new(second));

        let result = manager.get_response("prompt", TaskKind::Plain).await;
        assert!(result.success);
        assert_eq!(result.text, "text from a");
        assert_eq!(second_handle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fallback_to_second_provider() {
        let failing = MockProvider::named("a")
            .with_error(ProviderError::connection("a", "connection refused"));
        let succeeding = MockProvider::named("b").with_response("text from b");

        let mut manager = ProviderManager::new();
        manager.push_provider(Arc::new(failing));
        manager.push_provider(Arc::new(succeeding));

        let result = manager.get_response("prompt", TaskKind::Plain).await;
        assert!(result.success);
        assert_eq!(result.text, "text from b");
        assert_eq!(result.metadata.get("failed_attempts").map(String::as_str), Some("a"));
        assert_eq!(result.metadata.get("attempts").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn test_exhaustion_reports_all_attempts_and_last_error() {
        let first =
            MockProvider::named("a").with_error(ProviderError::connection("a", "refused"));
        let second = MockProvider::named("b")
            .with_error(ProviderError::rate_limited("b", "slow down"));

        let mut manager = ProviderManager::new();
        manager.push_provider(Arc::new(first));
        manager.push_provider(Arc::new(second));

        let result = manager.get_response("prompt", TaskKind::Plain).await;
        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("\"a\""));
        assert!(error.contains("\"b\""));
        assert!(error.contains("slow down"));
    }

    #[tokio::test]
    async fn test_unavailable_provider_not_counted_as_attempt() {
        let dead = MockProvider::named("dead").unavailable();
        let dead_handle = dead.clone();
        let alive = MockProvider::named("alive").with_response("text");

        let mut manager = ProviderManager::new();
        manager.push_provider(Arc::new(dead));
        manager.push_provider(Arc::new(alive));

        let result = manager.get_response("prompt", TaskKind::Plain).await;
        assert!(result.success);
        assert_eq!(dead_handle.call_count(), 0);
        assert_eq!(result.metadata.get("attempts").map(String::as_str), Some("1"));
        assert!(!result.metadata.contains_key("failed_attempts"));
    }

    #[tokio::test]
    async fn test_all_providers_unavailable() {
        let mut manager = ProviderManager::new();
        manager.push_provider(Arc::new(MockProvider::named("a").unavailable()));

        let result = manager.get_response("prompt", TaskKind::Plain).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("all skipped"));
    }

    #[tokio::test]
    async fn test_from_config_skips_unbuildable_providers() {
        // The remote provider has no api_key_env, so only the local one loads.
        let toml = r#"
fallback_order = ["remote", "local"]

[providers.remote]
enabled = true
kind = "openai_compat"
base_url = "https://example.invalid/v1"
model = "m"

[providers.local]
enabled = true
kind = "ollama"
base_url = "http://localhost:11434"
model = "codellama:7b"
"#;
        let config = LlmConfig::from_toml(toml).unwrap();
        let manager = ProviderManager::from_config(&config);
        assert_eq!(manager.provider_names(), vec!["local"]);
    }
}
