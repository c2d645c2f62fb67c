//! Backend model provider layer
//!
//! A unified interface over the configured model services: per-backend
//! adapters, adaptive timeouts, error classification, and the sequential
//! fallback manager the orchestrator talks to.

pub mod config;
pub mod errors;
pub mod manager;
pub mod mock;
pub mod ollama;
pub mod openai_compat;
pub mod provider;
pub mod registry;
pub mod timeout;
pub mod types;

pub use config::{LlmConfig, ProviderConfig, ProviderKind};
pub use errors::ProviderError;
pub use manager::ProviderManager;
pub use ollama::OllamaProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use provider::ModelProvider;
pub use timeout::adaptive_timeout;
pub use types::{CompletionOptions, Message, ProviderResult, Role, TargetLanguage, TaskKind};
