//! Syntax validation, mechanical repair, and stub analysis
//!
//! Candidate code goes through parse-based validation (Python gets a real
//! parser; other language tags get superficial checks), an auto-fixer for
//! mechanical breakage, and stub detection over a uniform function-span
//! model so the completion loop can target exactly the unfinished parts.

pub mod fixer;
pub mod python;
pub mod stubs;

use crate::response::{Payload, extract_payload, looks_like_prompt};
use serde::{Deserialize, Serialize};

pub use fixer::attempt_syntax_fix;
pub use python::{check_python, collect_functions};
pub use stubs::{contains_incomplete_functions, format_for_completion, merge_completed_functions};

/// Result of parsing one candidate program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxCheck {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

impl SyntaxCheck {
    pub fn valid() -> Self {
        Self { is_valid: true, issues: Vec::new() }
    }

    pub fn invalid(issue: impl Into<String>) -> Self {
        Self { is_valid: false, issues: vec![issue.into()] }
    }
}

/// Kinds of statements a function body can contain, as far as stub
/// detection cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementKind {
    Pass,
    Ellipsis,
    StringLiteral,
    Comment,
    Other,
}

/// Uniform representation of one function definition
///
/// Produced by a language-specific adapter; everything downstream (stub
/// detection, completion prompts, merging) works against this shape only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpan {
    /// Function name, unique within one source file for merge purposes
    pub name: String,
    /// Header from `def` through the colon
    pub signature: String,
    /// Body text as written
    pub body: String,
    /// Full definition source, header and body
    pub source: String,
    /// 1-indexed first line of the definition
    pub start_line: usize,
    /// 1-indexed last line of the definition
    pub end_line: usize,
    /// Statement kinds observed in the body, in order
    pub body_statements: Vec<StatementKind>,
    /// Whether the body is a placeholder rather than an implementation
    pub is_stub: bool,
}

/// Knobs for [`validate_and_extract_code`]
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Run the mechanical auto-fixer on parse failures
    pub attempt_fix: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self { attempt_fix: true }
    }
}

/// Outcome of the full extract → classify → parse → fix chain
#[derive(Debug, Clone)]
pub struct Validated {
    pub is_valid: bool,
    /// Best available code text; the fixed variant when a repair succeeded
    pub code: String,
    pub is_prompt_like: bool,
    /// Everything noteworthy that happened along the way, in order
    pub issues: Vec<String>,
}

/// Run one raw response through extraction, classification, validation,
/// and repair
///
/// Never panics and never loses information: every recovery step is
/// recorded as an issue so callers can tell a clean pass from a repaired
/// one.
pub fn validate_and_extract_code(text: &str, language: &str, options: &ValidateOptions) -> Validated {
    let mut issues = Vec::new();

    let payload = extract_payload(text);
    let code = match payload {
        Payload::Empty => {
            return Validated {
                is_valid: false,
                code: String::new(),
                is_prompt_like: false,
                issues: vec!["Empty response".to_string()],
            };
        }
        Payload::Error(message) => {
            return Validated {
                is_valid: false,
                code: String::new(),
                is_prompt_like: false,
                issues: vec![format!("Provider returned an error payload: {message}")],
            };
        }
        Payload::Code(code) => code,
    };

    let is_prompt_like = looks_like_prompt(text);
    let extraction_changed = code.trim() != text.trim();

    if is_prompt_like {
        if extraction_changed {
            issues.push("Extracted code from prompt".to_string());
        } else {
            issues.push("Response is a prompt, not code".to_string());
            return Validated { is_valid: false, code, is_prompt_like, issues };
        }
    }

    let check = match language {
        "python" | "py" => check_python(&code),
        _ => superficial_check(&code),
    };

    if check.is_valid {
        return Validated { is_valid: true, code, is_prompt_like, issues };
    }
    issues.extend(check.issues);

    if options.attempt_fix && matches!(language, "python" | "py") {
        if let Some(fixed) = attempt_syntax_fix(&code) {
            issues.push("Applied automatic syntax fix".to_string());
            return Validated { is_valid: true, code: fixed, is_prompt_like, issues };
        }
    }

    Validated { is_valid: false, code, is_prompt_like, issues }
}

/// Fallback validation for languages without a parser: balanced brackets
/// over non-empty text
fn superficial_check(code: &str) -> SyntaxCheck {
    if code.trim().is_empty() {
        return SyntaxCheck::invalid("Syntax error: empty source");
    }
    let unclosed = fixer::unclosed_brackets(code);
    if unclosed.is_empty() {
        SyntaxCheck::valid()
    } else {
        let expected: String = unclosed.iter().rev().collect();
        SyntaxCheck::invalid(format!("Syntax error: unbalanced brackets, expected '{expected}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_fenced_python() {
        let text = "Sure!\n```python\ndef add(a, b):\n    return a + b\n```";
        let validated = validate_and_extract_code(text, "python", &ValidateOptions::default());
        assert!(validated.is_valid);
        assert_eq!(validated.code, "def add(a, b):\n    return a + b");
    }

    #[test]
    fn test_pure_prompt_flagged() {
        let validated = validate_and_extract_code(
            "Create a function that adds two numbers",
            "python",
            &ValidateOptions::default(),
        );
        assert!(!validated.is_valid);
        assert!(validated.issues.iter().any(|issue| issue.contains("prompt, not code")));
    }

    #[test]
    fn test_fixable_error_reports_both() {
        let text = "def f():\n    print(\"hi";
        let validated = validate_and_extract_code(text, "python", &ValidateOptions::default());
        assert!(validated.is_valid);
        assert!(validated.issues.iter().any(|issue| issue.starts_with("Syntax error")));
        assert!(check_python(&validated.code).is_valid);
    }

    #[test]
    fn test_unfixable_error_stays_invalid() {
        let text = "def f(:\n    return((";
        let validated = validate_and_extract_code(text, "python", &ValidateOptions::default());
        assert!(!validated.is_valid);
        assert!(validated.issues.iter().any(|issue| issue.starts_with("Syntax error")));
    }

    #[test]
    fn test_error_payload() {
        let validated = validate_and_extract_code(
            r#"{"error": "model crashed"}"#,
            "python",
            &ValidateOptions::default(),
        );
        assert!(!validated.is_valid);
        assert!(validated.issues[0].contains("model crashed"));
    }

    #[test]
    fn test_superficial_check_for_other_languages() {
        let validated =
            validate_and_extract_code("int main() { return 0; }", "c", &ValidateOptions::default());
        assert!(validated.is_valid);

        let validated =
            validate_and_extract_code("int main() { return 0;", "c", &ValidateOptions::default());
        assert!(!validated.is_valid);
    }
}
