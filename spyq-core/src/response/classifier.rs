//! Prompt-vs-code classification
//!
//! Models sometimes echo the instructions back instead of producing a
//! program. Accepting that text as "generated code" poisons everything
//! downstream, so candidate text is screened first: instructional phrasing
//! with no code structure is a prompt, not code.

use once_cell::sync::Lazy;
use regex::Regex;

/// Imperative openers that start instruction text, including the Polish
/// command forms the original tool's users write
const IMPERATIVE_OPENERS: &[&str] = &[
    "create",
    "write",
    "implement",
    "generate",
    "make",
    "add",
    "build",
    "develop",
    "fix",
    "refactor",
    "please",
    "stwórz",
    "napisz",
    "utwórz",
    "zaimplementuj",
    "dodaj",
    "popraw",
];

/// Phrases that strongly suggest instructions rather than source text
const INSTRUCTIONAL_PHRASES: &[&str] = &[
    "a function that",
    "a class that",
    "a script that",
    "function which",
    "should return",
    "should take",
    "make sure",
    "funkcję",
    "klasę",
];

/// Structural tokens that only appear in source code
const CODE_TOKENS: &[&str] =
    &["def ", "class ", "import ", "from ", "return ", "lambda ", "print(", "->", "yield "];

static ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[A-Za-z_][A-Za-z0-9_.\[\]]*\s*=\s*\S").unwrap());

static FENCED_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());

/// Decide whether text is natural-language instructions rather than code
///
/// When fences are present, the fenced spans are stripped first and the
/// judgment runs on the surrounding prose: instructions wrapped around a
/// code block are still a prompt, so the caller knows extraction is needed
/// instead of accepting the blob wholesale.
pub fn looks_like_prompt(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    if trimmed.contains("```") {
        let remainder = FENCED_SPAN.replace_all(trimmed, "").trim().to_string();
        // A bare fenced block with no surrounding prose is just code.
        if remainder.len() < 20 {
            return false;
        }
        return is_instructional(&remainder) && !has_code_structure(&remainder);
    }

    is_instructional(trimmed) && !has_code_structure(trimmed)
}

/// Whether the text carries code-structural tokens
fn has_code_structure(text: &str) -> bool {
    if CODE_TOKENS.iter().any(|token| text.contains(token)) {
        return true;
    }
    if ASSIGNMENT.is_match(text) {
        return true;
    }
    // Indented block lines are a code signal prose does not produce
    text.lines().any(|line| {
        (line.starts_with("    ") || line.starts_with('\t')) && !line.trim().is_empty()
    })
}

/// Whether the text reads as imperative instructions
fn is_instructional(text: &str) -> bool {
    let lower = text.to_lowercase();

    let first_word = lower.split_whitespace().next().unwrap_or("");
    let first_word = first_word.trim_matches(|c: char| !c.is_alphabetic());
    if IMPERATIVE_OPENERS.contains(&first_word) {
        return true;
    }

    INSTRUCTIONAL_PHRASES.iter().filter(|phrase| lower.contains(*phrase)).count() >= 2
        || (IMPERATIVE_OPENERS.iter().any(|verb| lower.contains(verb))
            && INSTRUCTIONAL_PHRASES.iter().any(|phrase| lower.contains(phrase)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_instructions_are_prompt() {
        assert!(looks_like_prompt("Create a function that adds two numbers"));
        assert!(looks_like_prompt("Write a script that parses CSV files"));
        assert!(looks_like_prompt("Stwórz funkcję dodającą dwie liczby"));
    }

    #[test]
    fn test_pure_code_is_not_prompt() {
        assert!(!looks_like_prompt("def add(a, b):\n    return a + b"));
        assert!(!looks_like_prompt("import os\n\nprint(os.getcwd())"));
        assert!(!looks_like_prompt("x = 1\ny = 2"));
    }

    #[test]
    fn test_empty_is_not_prompt() {
        assert!(!looks_like_prompt(""));
        assert!(!looks_like_prompt("   \n "));
    }

    #[test]
    fn test_instructions_around_fence_still_prompt() {
        let text = "Please create a function that validates emails. \
                    Something like this would be a good starting point:\n\
                    ```python\ndef validate(email):\n    pass\n```";
        assert!(looks_like_prompt(text));
    }

    #[test]
    fn test_bare_fenced_code_is_not_prompt() {
        let text = "```python\ndef add(a, b):\n    return a + b\n```";
        assert!(!looks_like_prompt(text));
    }

    #[test]
    fn test_code_mentioning_create_is_not_prompt() {
        // The verb appears inside a string literal; structure wins.
        let text = "def main():\n    print(\"create a function\")";
        assert!(!looks_like_prompt(text));
    }
}
