//! Core functionality for SPYQ
//!
//! This crate contains the LLM-backed code generation core of the SPYQ
//! code-quality tool: response normalization, syntax validation and repair,
//! stub completion, and the multi-provider fallback layer feeding the
//! generation orchestrator.

pub mod llm;
pub mod response;
pub mod syntax;
pub mod synthesis;
pub mod validation;

pub use llm::{LlmConfig, ProviderManager};
pub use synthesis::{GenerationEngine, GenerationOutput, GenerationRequest};
pub use validation::{ContentValidator, ValidationReport};
