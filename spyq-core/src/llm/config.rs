//! Configuration for backend model providers
//!
//! Providers are declared in a TOML file, one table per backend, plus an
//! explicit fallback order. `${VAR}` and `${VAR:-default}` references are
//! resolved against the environment before parsing.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Which adapter implementation a provider table selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Local Ollama-style server (completion and chat endpoints)
    Ollama,
    /// Remote OpenAI-compatible chat endpoint
    OpenaiCompat,
}

/// One configured backend model service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub enabled: bool,
    pub kind: ProviderKind,
    #[serde(default)]
    pub priority: u32,
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the API key, for backends that need one
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Prefer the chat endpoint over single-turn completion
    #[serde(default)]
    pub use_chat: bool,
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Top-level provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider tables keyed by unique name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Explicit attempt order; takes precedence over numeric priority
    #[serde(default)]
    pub fallback_order: Vec<String>,

    /// Global default timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries within a single provider before falling through
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            fallback_order: Vec::new(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
        }
    }
}

impl LlmConfig {
    /// Load configuration from a TOML file, resolving `${VAR}` references
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let resolved = interpolate_env(content);
        let config: Self = toml::from_str(&resolved).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Enabled providers in attempt order
    ///
    /// Names listed in `fallback_order` come first, in that order; any
    /// remaining enabled providers follow, sorted by ascending priority
    /// number then name for a stable order.
    pub fn ordered_providers(&self) -> Vec<(String, ProviderConfig)> {
        let mut ordered = Vec::new();
        let mut taken: Vec<&str> = Vec::new();

        for name in &self.fallback_order {
            match self.providers.get(name) {
                Some(config) if config.enabled => {
                    ordered.push((name.clone(), config.clone()));
                    taken.push(name);
                }
                Some(_) => taken.push(name),
                None => warn!("fallback_order names unknown provider '{}'", name),
            }
        }

        let mut rest: Vec<_> = self
            .providers
            .iter()
            .filter(|(name, config)| config.enabled && !taken.contains(&name.as_str()))
            .map(|(name, config)| (name.clone(), config.clone()))
            .collect();
        rest.sort_by(|a, b| a.1.priority.cmp(&b.1.priority).then_with(|| a.0.cmp(&b.0)));
        ordered.extend(rest);

        ordered
    }
}

static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").unwrap());

/// Resolve `${VAR}` and `${VAR:-default}` references against the environment
///
/// Unset variables with no default are left verbatim so the TOML error points
/// at the unresolved reference instead of silently producing an empty value.
pub fn interpolate_env(content: &str) -> String {
    ENV_REF
        .replace_all(content, |caps: &regex::Captures| {
            let var = &caps[1];
            match std::env::var(var) {
                Ok(value) => value,
                Err(_) => match caps.get(2) {
                    Some(default) => default.as_str().to_string(),
                    None => {
                        warn!("environment variable '{}' is not set", var);
                        caps[0].to_string()
                    }
                },
            }
        })
        .into_owned()
}

/// Example configuration TOML
pub const EXAMPLE_CONFIG: &str = r#"
# SPYQ provider configuration

fallback_order = ["local", "remote"]
timeout_secs = 30
max_retries = 0

[providers.local]
enabled = true
kind = "ollama"
priority = 1
base_url = "http://localhost:11434"
model = "codellama:7b"
timeout_secs = 60

[providers.remote]
enabled = true
kind = "openai_compat"
priority = 2
base_url = "https://api.groq.com/openai/v1"
model = "llama3-70b-8192"
api_key_env = "GROQ_API_KEY"
use_chat = true
timeout_secs = 30

[providers.disabled_backup]
enabled = false
kind = "ollama"
priority = 9
base_url = "http://backup:11434"
model = "qwen2.5-coder:7b"
"#;
