//! Mock provider for testing
//!
//! A scripted, injectable implementation of the provider trait so the
//! fallback manager and the generation engine can be exercised
//! deterministically with no network access. Not available in production
//! builds.

#![cfg(test)]

use super::errors::ProviderError;
use super::provider::ModelProvider;
use super::types::{ProviderResult, TaskKind};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted provider: queued responses and errors, recorded prompts
#[derive(Clone)]
pub struct MockProvider {
    name: String,
    model: String,
    script: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    available: bool,
}

impl MockProvider {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            model: "mock-model".to_string(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            available: true,
        }
    }

    /// Queue a successful response
    pub fn with_response(self, text: &str) -> Self {
        self.script.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    /// Queue an error
    pub fn with_error(self, error: ProviderError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Number of generate calls made so far
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(
        &self,
        prompt: &str,
        _task: TaskKind,
    ) -> Result<ProviderResult, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(ProviderResult::ok(&self.name, &self.model, text)),
            Some(Err(error)) => Err(error),
            None => Ok(ProviderResult::ok(&self.name, &self.model, "mock response")),
        }
    }
}
