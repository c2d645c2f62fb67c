//! Code generation orchestration
//!
//! The state machine that drives a request from prompt to validated code,
//! plus its prompt templates, session state, and the scoring policy.

pub mod engine;
pub mod prompts;
pub mod scoring;
pub mod session;

pub use engine::{
    ContextBuilder, EngineError, GenerationEngine, GenerationOutput, RequestContext,
};
pub use prompts::PromptTemplates;
pub use scoring::{HeuristicScoring, ScoringPolicy};
pub use session::{
    CodeCandidate, DEFAULT_MAX_ITERATIONS, GenerationRequest, GenerationSession,
};
