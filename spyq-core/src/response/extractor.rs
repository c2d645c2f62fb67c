//! Code-block extraction from raw model responses
//!
//! Model servers rarely hand back bare source. The payload may be wrapped in
//! a JSON envelope, fenced in markdown, prefixed with prose, or be an error
//! message pretending to be a result. Everything here is total: extraction
//! never fails, it only degrades toward returning the input unchanged.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// What a raw response turned out to contain
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Extracted (or passed-through) code text
    Code(String),
    /// The backend reported an error instead of content
    Error(String),
    /// Nothing usable in the response
    Empty,
}

/// Fence with a language tag followed by a newline; the strictest shape
static FENCE_TAGGED_NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_+#-]*\n(.*?)```").unwrap());

/// Fence with a known language tag but no mandatory newline
static FENCE_TAGGED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```(?:(?:python|py|javascript|js|json|rust|bash|sh|text)\b)?[ \t]*(.*?)```")
        .unwrap()
});

/// Anything between backtick pairs; most permissive fallback
static FENCE_ANY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());

/// Pull fenced code spans out of markdown-ish text
///
/// Patterns are tried strictest first; the first one yielding non-empty
/// content wins, and multiple fenced spans are joined with a blank line.
/// Text with no fence markers is returned unchanged, as is text where every
/// pattern comes up empty.
pub fn extract_code_blocks(text: &str) -> String {
    if text.trim().is_empty() || !text.contains("```") {
        return text.to_string();
    }

    for (name, pattern) in [
        ("tagged+newline", &*FENCE_TAGGED_NEWLINE),
        ("tagged", &*FENCE_TAGGED),
        ("any", &*FENCE_ANY),
    ] {
        let spans: Vec<&str> = pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|span| !span.is_empty())
            .collect();

        if !spans.is_empty() {
            return spans.join("\n\n");
        }
        debug!("fence pattern '{}' matched nothing, falling through", name);
    }

    text.to_string()
}

/// Interpret one raw response: JSON envelope, error payload, or fenced text
pub fn extract_payload(text: &str) -> Payload {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Payload::Empty;
    }

    if trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            if let Some(message) = error_message(&value) {
                return Payload::Error(message);
            }
            if let Some(content) = extract_all_text_content(&value) {
                if content.trim().is_empty() {
                    return Payload::Empty;
                }
                return Payload::Code(extract_code_blocks(&content));
            }
        }
    }

    Payload::Code(extract_code_blocks(text))
}

/// Locate the text payload inside a backend JSON body
///
/// Backends disagree about where the text lives; fields are tried in
/// priority order: `response`, `code`, `content`, `message.content`,
/// `choices[0].message.content`, `choices[0].text`.
pub fn extract_all_text_content(value: &Value) -> Option<String> {
    let candidates = [
        value.get("response"),
        value.get("code"),
        value.get("content"),
        value.get("message").and_then(|m| m.get("content")),
        value
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content")),
        value.get("choices").and_then(|c| c.get(0)).and_then(|c| c.get("text")),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
}

/// Error payload detection: a string `error` field, or an object with `message`
fn error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(map) => Some(
            map.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        ),
        other => Some(other.to_string()),
    }
}
