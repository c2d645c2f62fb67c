//! Provider trait all backend adapters implement
//!
//! One adapter encapsulates one backend's wire format; the manager only ever
//! talks through this interface.

use super::errors::ProviderError;
use super::timeout::adaptive_timeout;
use super::types::{ProviderResult, TaskKind};
use async_trait::async_trait;
use std::time::Duration;

/// Common interface for backend model services
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Configured name of this provider
    fn name(&self) -> &str;

    /// Model ID requests are sent to
    fn model(&self) -> &str;

    /// Cheap availability probe; a `false` here means the backend is
    /// definitely unreachable and the manager may skip it without burning
    /// an attempt
    async fn is_available(&self) -> bool {
        true
    }

    /// Deadline for one request with this prompt
    ///
    /// The default is the adaptive computation from prompt length and task
    /// kind; adapters with a configured fixed timeout may override.
    fn request_timeout(&self, prompt: &str, task: TaskKind) -> Duration {
        adaptive_timeout(prompt.len(), task)
    }

    /// Send one generation request and normalize the backend's response
    ///
    /// Implementations must translate transport and HTTP failures into the
    /// `ProviderError` taxonomy; they never surface raw client errors.
    async fn generate(&self, prompt: &str, task: TaskKind)
    -> Result<ProviderResult, ProviderError>;
}
