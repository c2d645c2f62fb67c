//! Error types for provider operations
//!
//! Strongly-typed errors for everything that can go wrong while talking to a
//! backend model service, using thiserror for automatic error trait
//! implementations.

use std::time::Duration;
use thiserror::Error;

/// Errors produced by provider adapters and the fallback manager
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request exceeded its computed deadline
    #[error("Request to '{provider}' timed out after {duration:?}")]
    Timeout { provider: String, duration: Duration },

    /// Backend could not be reached
    #[error("Connection to '{provider}' failed: {message}")]
    Connection { provider: String, message: String },

    /// API key is missing or rejected
    #[error("Authentication failed for '{provider}': {message}")]
    Auth { provider: String, message: String },

    /// Backend is throttling us
    #[error("Rate limited by '{provider}': {message}")]
    RateLimited { provider: String, message: String },

    /// Model unknown to the backend
    #[error("Model '{model}' not found on '{provider}'")]
    ModelNotFound { provider: String, model: String },

    /// Backend returned a server-side failure
    #[error("Server error from '{provider}' (status {status}): {message}")]
    Server { provider: String, status: u16, message: String },

    /// Response body could not be interpreted
    #[error("Unusable response from '{provider}': {message}")]
    BadResponse { provider: String, message: String },

    /// Provider configuration is invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Every configured provider failed
    #[error("All providers exhausted ({attempted:?}); last error: {last_error}")]
    Exhausted { attempted: Vec<String>, last_error: String },
}

impl ProviderError {
    /// Create a timeout error
    pub fn timeout(provider: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout { provider: provider.into(), duration }
    }

    /// Create a connection error
    pub fn connection(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection { provider: provider.into(), message: message.into() }
    }

    /// Create an authentication error
    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth { provider: provider.into(), message: message.into() }
    }

    /// Create a rate limit error
    pub fn rate_limited(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RateLimited { provider: provider.into(), message: message.into() }
    }

    /// Create a model not found error
    pub fn model_not_found(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self::ModelNotFound { provider: provider.into(), model: model.into() }
    }

    /// Create a server error
    pub fn server(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Server { provider: provider.into(), status, message: message.into() }
    }

    /// Create a bad response error
    pub fn bad_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadResponse { provider: provider.into(), message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Classify an HTTP status code from a backend into an error variant
    pub fn from_status(provider: &str, model: &str, status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::auth(provider, body),
            404 => Self::model_not_found(provider, model),
            429 => Self::rate_limited(provider, body),
            _ => Self::server(provider, status, body),
        }
    }

    /// Classify a transport-level failure from reqwest
    pub fn from_transport(provider: &str, timeout: Duration, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(provider, timeout)
        } else if err.is_connect() {
            Self::connection(provider, err.to_string())
        } else {
            Self::bad_response(provider, err.to_string())
        }
    }
}

/// Result type for provider operations
pub type ProviderResultT<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::auth("ollama", "key rejected");
        assert_eq!(err.to_string(), "Authentication failed for 'ollama': key rejected");

        let err = ProviderError::timeout("remote", Duration::from_secs(30));
        assert!(err.to_string().contains("timed out"));

        let err = ProviderError::model_not_found("ollama", "codellama:99b");
        assert_eq!(err.to_string(), "Model 'codellama:99b' not found on 'ollama'");
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ProviderError::from_status("p", "m", 401, String::new()),
            ProviderError::Auth { .. }
        ));
        assert!(matches!(
            ProviderError::from_status("p", "m", 404, String::new()),
            ProviderError::ModelNotFound { .. }
        ));
        assert!(matches!(
            ProviderError::from_status("p", "m", 429, String::new()),
            ProviderError::RateLimited { .. }
        ));
        assert!(matches!(
            ProviderError::from_status("p", "m", 500, String::new()),
            ProviderError::Server { status: 500, .. }
        ));
    }

    #[test]
    fn test_exhausted_embeds_attempts() {
        let err = ProviderError::Exhausted {
            attempted: vec!["a".to_string(), "b".to_string()],
            last_error: "connection refused".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("\"a\""));
        assert!(text.contains("\"b\""));
        assert!(text.contains("connection refused"));
    }
}
