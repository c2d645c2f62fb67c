//! Mechanical syntax repair
//!
//! Truncated model output usually breaks in one of two boring ways: a string
//! literal left open at the end of a line, or brackets opened and never
//! closed. Both are fixable by appending the missing closer. Repairs are
//! strictly mechanical; nothing here rewrites semantics.

use super::python::check_python;
use tracing::debug;

/// Try the ordered repair strategies and return the first variant that parses
pub fn attempt_syntax_fix(code: &str) -> Option<String> {
    let string_fixed = close_unterminated_strings(code);
    let candidates = [
        string_fixed.clone(),
        close_trailing_brackets(code),
        close_trailing_brackets(&string_fixed),
    ];

    for candidate in candidates {
        if candidate != code && check_python(&candidate).is_valid {
            debug!("syntax fix succeeded after appending {} chars", candidate.len() - code.len());
            return Some(candidate);
        }
    }
    None
}

/// Close string literals left open at the end of a line
///
/// Lines holding triple-quoted strings are left alone; a line-local scan
/// cannot reason about them.
pub fn close_unterminated_strings(code: &str) -> String {
    let fixed: Vec<String> = code.lines().map(close_line_string).collect();
    let mut result = fixed.join("\n");
    if code.ends_with('\n') {
        result.push('\n');
    }
    result
}

fn close_line_string(line: &str) -> String {
    if line.contains("\"\"\"") || line.contains("'''") {
        return line.to_string();
    }

    let mut in_double = false;
    let mut in_single = false;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' if in_double || in_single => {
                chars.next();
            }
            '"' if !in_single => in_double = !in_double,
            '\'' if !in_double => in_single = !in_single,
            '#' if !in_double && !in_single => break,
            _ => {}
        }
    }

    if in_double {
        format!("{line}\"")
    } else if in_single {
        format!("{line}'")
    } else {
        line.to_string()
    }
}

/// Append the closers for brackets left open at the end of the source
pub fn close_trailing_brackets(code: &str) -> String {
    let unclosed = unclosed_brackets(code);
    if unclosed.is_empty() {
        return code.to_string();
    }
    let closers: String = unclosed.iter().rev().collect();
    format!("{code}{closers}")
}

/// Expected closing brackets, in opening order, outside strings and comments
///
/// A mismatched closer means the structure is broken beyond appending
/// characters; the stray closer is skipped so the scan stays total.
pub fn unclosed_brackets(code: &str) -> Vec<char> {
    let mut stack = Vec::new();
    let mut in_double = false;
    let mut in_single = false;
    let mut in_comment = false;

    let chars: Vec<char> = code.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        // Triple-quoted strings are skipped wholesale
        if !in_comment && !in_double && !in_single && (c == '"' || c == '\'') {
            if chars[i..].starts_with(&[c, c, c]) {
                if let Some(offset) = find_triple(&chars[i + 3..], c) {
                    i += 3 + offset + 3;
                    continue;
                }
                // Unterminated triple quote swallows the rest
                break;
            }
        }

        match c {
            '\n' => {
                // A newline terminates broken single-line strings and comments
                in_double = false;
                in_single = false;
                in_comment = false;
            }
            _ if in_comment => {}
            '\\' if in_double || in_single => {
                i += 1;
            }
            '"' if !in_single => in_double = !in_double,
            '\'' if !in_double => in_single = !in_single,
            '#' if !in_double && !in_single => in_comment = true,
            '(' if !in_double && !in_single => stack.push(')'),
            '[' if !in_double && !in_single => stack.push(']'),
            '{' if !in_double && !in_single => stack.push('}'),
            ')' | ']' | '}' if !in_double && !in_single => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ => {}
        }
        i += 1;
    }

    stack
}

fn find_triple(chars: &[char], quote: char) -> Option<usize> {
    chars.windows(3).position(|window| window == [quote, quote, quote])
}
