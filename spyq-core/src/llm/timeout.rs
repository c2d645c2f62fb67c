//! Adaptive request timeouts
//!
//! A fixed timeout is wrong in both directions for model servers: short
//! prompts finish in seconds while long code-generation prompts can
//! legitimately run for minutes. The deadline is computed from prompt length
//! and task kind instead, then clamped to a hard ceiling.

use super::types::{TargetLanguage, TaskKind};
use std::time::Duration;

/// Base timeout applied to every request
pub const BASE_TIMEOUT_SECS: f64 = 30.0;

/// Hard ceiling; nothing blocks longer than this
pub const MAX_TIMEOUT_SECS: f64 = 300.0;

const MEDIUM_PROMPT_SECS_PER_CHAR: f64 = 0.05;
const LONG_PROMPT_SECS_PER_CHAR: f64 = 0.02;
const LONG_PROMPT_OFFSET_SECS: f64 = 45.0;
const CODE_GENERATION_FACTOR: f64 = 1.5;

/// Compute the deadline for one provider attempt
pub fn adaptive_timeout(prompt_len: usize, task: TaskKind) -> Duration {
    let len = prompt_len as f64;

    let mut secs = if prompt_len < 100 {
        BASE_TIMEOUT_SECS
    } else if prompt_len < 1000 {
        BASE_TIMEOUT_SECS + (len - 100.0) * MEDIUM_PROMPT_SECS_PER_CHAR
    } else {
        BASE_TIMEOUT_SECS + LONG_PROMPT_OFFSET_SECS + (len - 1000.0) * LONG_PROMPT_SECS_PER_CHAR
    };

    if let TaskKind::CodeGeneration(language) = task {
        secs *= CODE_GENERATION_FACTOR * language_factor(language);
    }

    Duration::from_secs_f64(secs.min(MAX_TIMEOUT_SECS))
}

/// Languages that models are historically slower to get right get more time
fn language_factor(language: TargetLanguage) -> f64 {
    match language {
        TargetLanguage::Cpp | TargetLanguage::Java | TargetLanguage::Rust => 1.25,
        TargetLanguage::Python | TargetLanguage::JavaScript => 1.1,
        TargetLanguage::Go | TargetLanguage::Other => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_prompt_uses_base() {
        let timeout = adaptive_timeout(50, TaskKind::Plain);
        assert_eq!(timeout, Duration::from_secs_f64(BASE_TIMEOUT_SECS));
    }

    #[test]
    fn test_medium_prompt_scales_linearly() {
        let timeout = adaptive_timeout(500, TaskKind::Plain);
        assert_eq!(timeout, Duration::from_secs_f64(30.0 + 400.0 * 0.05));
    }

    #[test]
    fn test_long_prompt_gets_offset() {
        let timeout = adaptive_timeout(2000, TaskKind::Plain);
        assert_eq!(timeout, Duration::from_secs_f64(30.0 + 45.0 + 1000.0 * 0.02));
    }

    #[test]
    fn test_code_generation_multiplier() {
        let plain = adaptive_timeout(500, TaskKind::Plain);
        let python = adaptive_timeout(500, TaskKind::python_codegen());
        let rust = adaptive_timeout(500, TaskKind::CodeGeneration(TargetLanguage::Rust));
        assert!(python > plain);
        assert!(rust > python);
    }

    #[test]
    fn test_hard_ceiling() {
        let timeout = adaptive_timeout(1_000_000, TaskKind::CodeGeneration(TargetLanguage::Cpp));
        assert_eq!(timeout, Duration::from_secs_f64(MAX_TIMEOUT_SECS));
    }
}
