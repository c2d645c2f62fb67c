//! Incomplete-function detection and completion merging
//!
//! Models routinely hand back programs whose hard parts are `pass`, `...`,
//! or a TODO comment. Those stubs are found here, turned into a targeted
//! re-prompt, and the model's completions are merged back by function name
//! without ever corrupting the code that already worked.

use super::python::collect_functions;
use super::{FunctionSpan, StatementKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

static STUB_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)#[^\n]*\b(todo|fixme|xxx|implement|placeholder)\b").unwrap());

const MARKER: &str = "# INCOMPLETE: implement";

const COMPLETION_PREAMBLE: &str = "The following Python file contains unfinished functions, \
each marked with a `# INCOMPLETE` comment on the line above its definition. \
Implement exactly the marked functions. Keep every signature and docstring unchanged, \
leave all other code untouched, and return the complete file in a single ```python block.";

/// Language-agnostic stub predicate over the uniform body representation
///
/// A body is a stub when it is empty, only `pass`, a docstring plus optional
/// `pass`, contains a bare ellipsis statement, or carries a
/// TODO/FIXME/XXX/IMPLEMENT/PLACEHOLDER comment.
pub fn is_stub_body(statements: &[StatementKind], body_text: &str) -> bool {
    if STUB_COMMENT.is_match(body_text) {
        return true;
    }

    let real: Vec<StatementKind> =
        statements.iter().copied().filter(|kind| *kind != StatementKind::Comment).collect();

    if real.is_empty() {
        return true;
    }
    if real.iter().all(|kind| *kind == StatementKind::Pass) {
        return true;
    }
    if real.iter().any(|kind| *kind == StatementKind::Ellipsis) {
        return true;
    }
    real[0] == StatementKind::StringLiteral
        && real[1..].iter().all(|kind| *kind == StatementKind::Pass)
}

/// Find stub functions in a source file
///
/// Unparsable input yields `(false, [])`: analysis cannot proceed, and
/// guessing would be worse than reporting nothing.
pub fn contains_incomplete_functions(code: &str) -> (bool, Vec<FunctionSpan>) {
    match collect_functions(code) {
        Some(spans) => {
            let stubs: Vec<FunctionSpan> = spans.into_iter().filter(|span| span.is_stub).collect();
            (!stubs.is_empty(), stubs)
        }
        None => {
            debug!("stub detection skipped: source does not parse");
            (false, Vec::new())
        }
    }
}

/// Build the completion re-prompt: source annotated with a marker above each
/// stub, wrapped in the instructional preamble
pub fn format_for_completion(code: &str, stubs: &[FunctionSpan]) -> String {
    let mut lines: Vec<String> = code.lines().map(String::from).collect();

    let mut ordered: Vec<&FunctionSpan> = stubs.iter().collect();
    ordered.sort_by(|a, b| b.start_line.cmp(&a.start_line));

    for stub in ordered {
        let index = stub.start_line.saturating_sub(1).min(lines.len());
        let indent = indent_of(lines.get(index).map(String::as_str).unwrap_or(""));
        lines.insert(index, format!("{indent}{MARKER} `{}`", stub.name));
    }

    format!("{COMPLETION_PREAMBLE}\n\n```python\n{}\n```", lines.join("\n"))
}

/// Merge completed function bodies back into the original source
///
/// Only functions that were flagged incomplete in the original and are
/// present (and no longer stubs) in the completed source are replaced, by
/// full line range. A completed response that fails to parse leaves the
/// original untouched.
pub fn merge_completed_functions(original: &str, completed: &str) -> String {
    let (has_stubs, stubs) = contains_incomplete_functions(original);
    if !has_stubs {
        return original.to_string();
    }

    let Some(completed_spans) = collect_functions(completed) else {
        debug!("completion response does not parse, keeping original source");
        return original.to_string();
    };
    let completed_by_name: HashMap<&str, &FunctionSpan> =
        completed_spans.iter().map(|span| (span.name.as_str(), span)).collect();

    let completed_lines: Vec<&str> = completed.lines().collect();
    let mut lines: Vec<String> = original.lines().map(String::from).collect();

    let mut targets: Vec<&FunctionSpan> = stubs
        .iter()
        .filter(|stub| completed_by_name.get(stub.name.as_str()).is_some_and(|c| !c.is_stub))
        .collect();
    targets.sort_by(|a, b| b.start_line.cmp(&a.start_line));

    let mut replaced: Vec<(usize, usize)> = Vec::new();
    for stub in targets {
        // A stub nested inside an already-replaced span is gone with it
        if replaced.iter().any(|(start, end)| stub.start_line >= *start && stub.end_line <= *end) {
            continue;
        }

        let replacement = completed_by_name[stub.name.as_str()];
        let new_lines = reindented_span(&completed_lines, replacement, &lines[stub.start_line - 1]);
        lines.splice(stub.start_line - 1..stub.end_line, new_lines);
        replaced.push((stub.start_line, stub.end_line));
        debug!("merged completion for function '{}'", stub.name);
    }

    let mut result = lines.join("\n");
    if original.ends_with('\n') && !result.ends_with('\n') {
        result.push('\n');
    }
    result
}

/// Replacement lines for one span, shifted to the stub's indentation level
fn reindented_span(
    completed_lines: &[&str],
    span: &FunctionSpan,
    stub_def_line: &str,
) -> Vec<String> {
    let source_lines = &completed_lines[span.start_line - 1..span.end_line.min(completed_lines.len())];
    let from_indent = source_lines.first().map(|line| indent_of(line)).unwrap_or_default();
    let to_indent = indent_of(stub_def_line);

    source_lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else if let Some(stripped) = line.strip_prefix(from_indent.as_str()) {
                format!("{to_indent}{stripped}")
            } else {
                (*line).to_string()
            }
        })
        .collect()
}

fn indent_of(line: &str) -> String {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_body_detected() {
        let (has, stubs) = contains_incomplete_functions("def add(a, b):\n    pass");
        assert!(has);
        assert_eq!(stubs.len(), 1);
        assert_eq!(stubs[0].name, "add");
        assert_eq!(stubs[0].start_line, 1);
    }

    #[test]
    fn test_complete_functions_report_nothing() {
        let code = "def add(a, b):\n    return a + b\n\ndef sub(a, b):\n    return a - b\n";
        let (has, stubs) = contains_incomplete_functions(code);
        assert!(!has);
        assert!(stubs.is_empty());
    }

    #[test]
    fn test_docstring_only_is_stub() {
        let code = "def f():\n    \"\"\"Does something important.\"\"\"\n";
        let (has, _) = contains_incomplete_functions(code);
        assert!(has);
    }

    #[test]
    fn test_docstring_plus_pass_is_stub() {
        let code = "def f():\n    \"\"\"Docs.\"\"\"\n    pass\n";
        let (has, _) = contains_incomplete_functions(code);
        assert!(has);
    }

    #[test]
    fn test_ellipsis_is_stub() {
        let (has, _) = contains_incomplete_functions("def f():\n    ...\n");
        assert!(has);
    }

    #[test]
    fn test_todo_comment_is_stub() {
        let code = "def f():\n    # TODO: handle the edge cases\n    return 0\n";
        let (has, stubs) = contains_incomplete_functions(code);
        assert!(has);
        assert_eq!(stubs[0].name, "f");
    }

    #[test]
    fn test_docstring_with_real_body_not_stub() {
        let code = "def f():\n    \"\"\"Docs.\"\"\"\n    return 42\n";
        let (has, _) = contains_incomplete_functions(code);
        assert!(!has);
    }

    #[test]
    fn test_broken_source_degrades_gracefully() {
        let (has, stubs) = contains_incomplete_functions("def broken(:\n    pass");
        assert!(!has);
        assert!(stubs.is_empty());
    }

    #[test]
    fn test_format_places_marker_above_definition() {
        let code = "def ready():\n    return 1\n\ndef todo_one():\n    pass\n";
        let (_, stubs) = contains_incomplete_functions(code);
        let prompt = format_for_completion(code, &stubs);

        assert!(prompt.contains("# INCOMPLETE: implement `todo_one`"));
        assert!(!prompt.contains("`ready`"));

        let marker_pos = prompt.find("# INCOMPLETE: implement `todo_one`").unwrap();
        let def_pos = prompt.find("def todo_one").unwrap();
        assert!(marker_pos < def_pos);
    }

    #[test]
    fn test_merge_scenario() {
        let original = "def add(a, b):\n    pass";
        let completed = "def add(a, b):\n    return a + b";
        let merged = merge_completed_functions(original, completed);
        assert!(!merged.contains("pass"));
        assert!(merged.contains("return a + b"));
    }

    #[test]
    fn test_merge_keeps_untouched_functions() {
        let original =
            "def keep(x):\n    return x * 2\n\ndef fill_in(a, b):\n    pass\n";
        let completed = "def fill_in(a, b):\n    return a + b\n";
        let merged = merge_completed_functions(original, completed);
        assert!(merged.contains("return x * 2"));
        assert!(merged.contains("return a + b"));
        assert!(!merged.contains("pass"));
    }

    #[test]
    fn test_merge_safety_on_corrupted_response() {
        let original = "def add(a, b):\n    pass";
        let merged = merge_completed_functions(original, "I'm sorry, I can't ((( parse this");
        assert_eq!(merged, original);
    }

    #[test]
    fn test_merge_ignores_functions_missing_from_completion() {
        let original = "def one():\n    pass\n\ndef two():\n    pass\n";
        let completed = "def one():\n    return 1\n";
        let merged = merge_completed_functions(original, completed);
        assert!(merged.contains("return 1"));
        assert!(merged.contains("def two():\n    pass"));
    }

    #[test]
    fn test_merge_skips_completions_that_are_still_stubs() {
        let original = "def f():\n    pass";
        let completed = "def f():\n    pass";
        let merged = merge_completed_functions(original, completed);
        assert_eq!(merged, original);
    }

    #[test]
    fn test_merge_reindents_method_completion() {
        let original = "class C:\n    def m(self):\n        pass\n";
        let completed = "def m(self):\n    return 42\n";
        let merged = merge_completed_functions(original, completed);
        assert!(merged.contains("    def m(self):"));
        assert!(merged.contains("        return 42"));
    }
}
