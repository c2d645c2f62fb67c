//! Generation orchestrator
//!
//! The top-level state machine: build context, call the provider manager,
//! run the response through classification, extraction, validation and
//! repair, then loop on stub completion until the code is whole or the
//! iteration budget runs out. Stage failures never escape as raw errors;
//! every terminal state is a descriptive result.

use super::prompts::PromptTemplates;
use super::scoring::{HeuristicScoring, ScoringPolicy};
use super::session::{CodeCandidate, GenerationRequest, GenerationSession};
use crate::llm::{ProviderManager, TaskKind};
use crate::syntax::{
    ValidateOptions, check_python, contains_incomplete_functions, format_for_completion,
    merge_completed_functions, validate_and_extract_code,
};
use crate::validation::{ContentValidator, PermissiveValidator, ValidationReport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Terminal failure states of a generation run
#[derive(Debug, Error)]
pub enum EngineError {
    /// The model kept answering with instructions instead of code
    #[error("Model output is a prompt, not code: {0}")]
    PromptNotCode(String),

    /// Syntax errors survived both mechanical repair and re-prompting
    #[error("Unfixable syntax error: {0}")]
    Syntax(String),

    /// The provider layer failed; the message embeds the attempts made
    #[error("Provider failure: {0}")]
    Provider(String),
}

/// Supplies the prompt context map for a request
///
/// Project rules, recent changes and the like come from external
/// collaborators; the engine only sees the resulting map.
pub trait ContextBuilder: Send + Sync {
    fn build_context(&self, request: &GenerationRequest) -> HashMap<String, String>;
}

/// Default context builder: pass the request's own context through
pub struct RequestContext;

impl ContextBuilder for RequestContext {
    fn build_context(&self, request: &GenerationRequest) -> HashMap<String, String> {
        request.context.clone()
    }
}

/// Terminal result of a successful generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub generated_code: String,
    pub quality_score: f32,
    pub iterations_used: u32,
    pub issues: Vec<String>,
    pub validation: ValidationReport,
    pub session_id: String,
}

/// What the next provider call means to the state machine
enum NextCall {
    /// Initial generation or a retry of it
    Fresh,
    /// Stub completion to be merged into working code
    Completion { base: String },
}

/// Top-level generation orchestrator
pub struct GenerationEngine {
    manager: ProviderManager,
    context_builder: Box<dyn ContextBuilder>,
    validator: Box<dyn ContentValidator>,
    scoring: Box<dyn ScoringPolicy>,
}

impl GenerationEngine {
    pub fn new(manager: ProviderManager) -> Self {
        Self {
            manager,
            context_builder: Box::new(RequestContext),
            validator: Box::new(PermissiveValidator),
            scoring: Box::new(HeuristicScoring::default()),
        }
    }

    pub fn with_context_builder(mut self, builder: Box<dyn ContextBuilder>) -> Self {
        self.context_builder = builder;
        self
    }

    pub fn with_validator(mut self, validator: Box<dyn ContentValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_scoring(mut self, scoring: Box<dyn ScoringPolicy>) -> Self {
        self.scoring = scoring;
        self
    }

    /// Run one generation request to a terminal state
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, EngineError> {
        let mut session = GenerationSession::new(request);
        let max_iterations = session.effective_max_iterations();
        let context = self.context_builder.build_context(&session.request);

        info!(
            session = %session.request.session_id,
            max_iterations,
            fast_mode = session.request.fast_mode,
            "starting generation"
        );

        let mut issues: Vec<String> = Vec::new();
        let mut prompt = PromptTemplates::generation(&session.request.user_request, &context);
        let mut mode = NextCall::Fresh;

        loop {
            session.iteration += 1;
            let last_iteration = session.iteration >= max_iterations;
            debug!(iteration = session.iteration, last_iteration, "calling provider");

            let result = self.manager.get_response(&prompt, TaskKind::python_codegen()).await;
            if !result.success {
                let message =
                    result.error.unwrap_or_else(|| "provider returned no error detail".to_string());
                warn!(session = %session.request.session_id, error = %message, "generation failed");
                return Err(EngineError::Provider(message));
            }

            let validated =
                validate_and_extract_code(&result.text, "python", &ValidateOptions::default());
            session.record(CodeCandidate {
                raw_text: result.text.clone(),
                extracted_code: Some(validated.code.clone()),
                is_prompt_like: validated.is_prompt_like,
                syntax_valid: validated.is_valid,
                issues: validated.issues.clone(),
            });
            issues.extend(validated.issues.iter().cloned());

            if !validated.is_valid {
                match &mode {
                    NextCall::Completion { base } => {
                        // Never let a bad completion damage working code.
                        if last_iteration {
                            issues.push(
                                "Completion response was unusable; stubs left in place"
                                    .to_string(),
                            );
                            return Ok(self.finish(session, base.clone(), issues));
                        }
                        debug!("completion response unusable, re-asking");
                        continue;
                    }
                    NextCall::Fresh if validated.is_prompt_like => {
                        if last_iteration {
                            return Err(EngineError::PromptNotCode(last_issue(&validated.issues)));
                        }
                        prompt = PromptTemplates::code_only_retry(&session.request.user_request);
                        continue;
                    }
                    NextCall::Fresh => {
                        if last_iteration {
                            return Err(EngineError::Syntax(last_issue(&validated.issues)));
                        }
                        prompt = PromptTemplates::repair(&validated.code, &validated.issues);
                        continue;
                    }
                }
            }

            let current = match mode {
                NextCall::Fresh => validated.code,
                NextCall::Completion { base } => {
                    let merged = merge_completed_functions(&base, &validated.code);
                    if check_python(&merged).is_valid {
                        merged
                    } else {
                        issues.push(
                            "Merged completion did not parse; keeping previous code".to_string(),
                        );
                        base
                    }
                }
            };

            let (has_stubs, stubs) = contains_incomplete_functions(&current);
            if !has_stubs {
                return Ok(self.finish(session, current, issues));
            }

            let names: Vec<&str> = stubs.iter().map(|span| span.name.as_str()).collect();
            if last_iteration {
                issues.push(format!(
                    "Incomplete functions remain after {} iterations: {}",
                    session.iteration,
                    names.join(", ")
                ));
                return Ok(self.finish(session, current, issues));
            }

            info!(functions = ?names, "requesting completion for stub functions");
            prompt = format_for_completion(&current, &stubs);
            mode = NextCall::Completion { base: current };
        }
    }

    /// Promote final code and assemble the terminal output
    ///
    /// Only reached with syntactically valid code; prompt-like text never
    /// gets here.
    fn finish(
        &self,
        mut session: GenerationSession,
        code: String,
        issues: Vec<String>,
    ) -> GenerationOutput {
        let validation = self.validator.validate_content(&code);
        let quality_score = self.scoring.score(&code, &issues);
        session.promote(code.clone(), quality_score);

        info!(
            session = %session.request.session_id,
            iterations = session.iteration,
            quality_score,
            "generation finished"
        );

        GenerationOutput {
            generated_code: code,
            quality_score,
            iterations_used: session.iteration,
            issues,
            validation,
            session_id: session.request.session_id.clone(),
        }
    }
}

fn last_issue(issues: &[String]) -> String {
    issues.last().cloned().unwrap_or_else(|| "no detail recorded".to_string())
}
