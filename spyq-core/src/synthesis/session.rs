//! Generation request and session state
//!
//! One session owns one request and advances one iteration at a time until
//! the engine reaches a terminal state. Sessions are serde-serializable so
//! hosts can persist history; nothing here touches disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Default iteration bound for a generation run
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// One code-generation request, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub user_request: String,
    pub context: HashMap<String, String>,
    pub session_id: String,
    pub max_iterations: u32,
    pub fast_mode: bool,
}

impl GenerationRequest {
    pub fn new(user_request: impl Into<String>) -> Self {
        Self {
            user_request: user_request.into(),
            context: HashMap::new(),
            session_id: Uuid::new_v4().to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            fast_mode: false,
        }
    }

    pub fn with_context(mut self, context: HashMap<String, String>) -> Self {
        self.context = context;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_fast_mode(mut self, fast_mode: bool) -> Self {
        self.fast_mode = fast_mode;
        self
    }
}

/// One candidate program as it moves through the pipeline stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeCandidate {
    pub raw_text: String,
    pub extracted_code: Option<String>,
    pub is_prompt_like: bool,
    pub syntax_valid: bool,
    pub issues: Vec<String>,
}

impl CodeCandidate {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            extracted_code: None,
            is_prompt_like: false,
            syntax_valid: false,
            issues: Vec::new(),
        }
    }
}

/// State of one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSession {
    pub request: GenerationRequest,
    pub iteration: u32,
    pub history: Vec<CodeCandidate>,
    pub final_code: Option<String>,
    pub quality_score: Option<f32>,
    pub started_at: DateTime<Utc>,
}

impl GenerationSession {
    pub fn new(request: GenerationRequest) -> Self {
        Self {
            request,
            iteration: 0,
            history: Vec::new(),
            final_code: None,
            quality_score: None,
            started_at: Utc::now(),
        }
    }

    /// Iteration bound for this run; fast mode forces exactly one
    pub fn effective_max_iterations(&self) -> u32 {
        if self.request.fast_mode { 1 } else { self.request.max_iterations.max(1) }
    }

    pub fn record(&mut self, candidate: CodeCandidate) {
        self.history.push(candidate);
    }

    /// Promote a candidate's code to the final output
    ///
    /// Callers must only promote syntactically valid code; the engine
    /// enforces that invariant.
    pub fn promote(&mut self, code: String, quality_score: f32) {
        self.final_code = Some(code);
        self.quality_score = Some(quality_score);
    }
}
