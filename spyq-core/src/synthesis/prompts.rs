//! Prompt templates for the generation loop
//!
//! Three prompt shapes: the initial generation request with project
//! context, a repair-directed re-prompt for code that would not parse, and
//! a code-only retry when the model answered with prose. The stub
//! completion prompt lives with the stub engine, next to the marker format
//! it depends on.

use std::collections::HashMap;

pub struct PromptTemplates;

impl PromptTemplates {
    /// Initial generation prompt: context map rendered above the task
    pub fn generation(user_request: &str, context: &HashMap<String, String>) -> String {
        let mut prompt = String::from(
            "You are an expert Python developer. Write clean, working, complete Python code.\n",
        );

        if !context.is_empty() {
            prompt.push_str("\nProject context:\n");
            let mut keys: Vec<&String> = context.keys().collect();
            keys.sort();
            for key in keys {
                prompt.push_str(&format!("- {}: {}\n", key, context[key]));
            }
        }

        prompt.push_str(&format!(
            "\nTask:\n{user_request}\n\n\
             Return only Python code in a single ```python fenced block. \
             Implement every function fully; do not leave pass statements or TODO comments.\n"
        ));
        prompt
    }

    /// Re-prompt after the model answered with instructions instead of code
    pub fn code_only_retry(user_request: &str) -> String {
        format!(
            "Your previous reply was a description, not code.\n\n\
             Task:\n{user_request}\n\n\
             Reply with nothing but Python code in a single ```python fenced block.\n"
        )
    }

    /// Repair-directed re-prompt for code with unfixable syntax errors
    pub fn repair(code: &str, issues: &[String]) -> String {
        let mut prompt = String::from(
            "The following Python code does not parse. Fix the syntax errors and return \
             the corrected file in a single ```python fenced block. Do not change the \
             program's behavior.\n\nErrors:\n",
        );
        for issue in issues {
            prompt.push_str(&format!("- {issue}\n"));
        }
        prompt.push_str(&format!("\n```python\n{code}\n```\n"));
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_includes_context_and_task() {
        let mut context = HashMap::new();
        context.insert("project_rules".to_string(), "max line length 88".to_string());

        let prompt = PromptTemplates::generation("add a parser", &context);
        assert!(prompt.contains("project_rules: max line length 88"));
        assert!(prompt.contains("add a parser"));
        assert!(prompt.contains("```python"));
    }

    #[test]
    fn test_generation_without_context() {
        let prompt = PromptTemplates::generation("do the thing", &HashMap::new());
        assert!(!prompt.contains("Project context"));
    }

    #[test]
    fn test_repair_lists_issues() {
        let issues = vec!["Syntax error: invalid syntax at line 2".to_string()];
        let prompt = PromptTemplates::repair("def f(:", &issues);
        assert!(prompt.contains("line 2"));
        assert!(prompt.contains("def f(:"));
    }
}
