//! Static provider registry
//!
//! Provider kinds map to constructors at configuration-parse time. An
//! unknown kind is a TOML parse error, not a runtime lookup failure.

use super::config::{ProviderConfig, ProviderKind};
use super::errors::ProviderError;
use super::ollama::OllamaProvider;
use super::openai_compat::OpenAiCompatProvider;
use super::provider::ModelProvider;
use std::sync::Arc;

/// Construct the adapter a provider table selects
pub fn build_provider(
    name: &str,
    config: &ProviderConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    match config.kind {
        ProviderKind::Ollama => Ok(Arc::new(OllamaProvider::new(name, config)?)),
        ProviderKind::OpenaiCompat => Ok(Arc::new(OpenAiCompatProvider::new(name, config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_build_ollama_provider() {
        let config = ProviderConfig {
            enabled: true,
            kind: ProviderKind::Ollama,
            priority: 1,
            base_url: "http://localhost:11434".to_string(),
            model: "codellama:7b".to_string(),
            timeout_secs: 30,
            api_key_env: None,
            use_chat: false,
            extra: HashMap::new(),
        };
        let provider = build_provider("local", &config).unwrap();
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_openai_compat_without_key_env_fails_to_build() {
        let config = ProviderConfig {
            enabled: true,
            kind: ProviderKind::OpenaiCompat,
            priority: 1,
            base_url: "https://example.invalid/v1".to_string(),
            model: "m".to_string(),
            timeout_secs: 30,
            api_key_env: None,
            use_chat: true,
            extra: HashMap::new(),
        };
        assert!(build_provider("remote", &config).is_err());
    }
}
