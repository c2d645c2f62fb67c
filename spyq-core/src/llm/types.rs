//! Common types shared by all provider adapters
//!
//! Defines the request/response model the manager and orchestrator speak,
//! independent of any one backend's wire format.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A message in a chat-style conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Message role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Sampling options sent with completion and chat requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: Some(0.2),
            num_predict: Some(2048),
            top_p: None,
            top_k: None,
            stop: None,
        }
    }
}

/// Outcome of one provider attempt
///
/// Immutable once built; the manager hands it straight to the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResult {
    pub success: bool,
    pub text: String,
    pub error: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl ProviderResult {
    /// Successful attempt carrying raw response text
    pub fn ok(provider: &str, model: &str, text: impl Into<String>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("provider".to_string(), provider.to_string());
        metadata.insert("model".to_string(), model.to_string());
        Self { success: true, text: text.into(), error: None, metadata }
    }

    /// Failed attempt carrying a human-readable message
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: String::new(),
            error: Some(error.into()),
            metadata: HashMap::new(),
        }
    }

    /// Name of the provider that produced this result, when known
    pub fn provider(&self) -> Option<&str> {
        self.metadata.get("provider").map(String::as_str)
    }
}

/// What kind of work the prompt is asking the model for
///
/// Drives the adaptive timeout: code generation gets more headroom, and some
/// target languages get more still.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Plain text completion or question answering
    Plain,
    /// Generating source code in the given language
    CodeGeneration(TargetLanguage),
}

impl TaskKind {
    pub fn python_codegen() -> Self {
        Self::CodeGeneration(TargetLanguage::Python)
    }
}

/// Target language of a code-generation task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    Python,
    JavaScript,
    Rust,
    Cpp,
    Java,
    Go,
    Other,
}

impl TargetLanguage {
    /// Parse a loose language tag the way model output labels them
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "python" | "py" => Self::Python,
            "javascript" | "js" | "typescript" | "ts" => Self::JavaScript,
            "rust" | "rs" => Self::Rust,
            "cpp" | "c++" | "cxx" => Self::Cpp,
            "java" => Self::Java,
            "go" | "golang" => Self::Go,
            _ => Self::Other,
        }
    }
}
