//! Python language adapter over tree-sitter
//!
//! Parses candidate source, reports syntax errors with line numbers, and
//! lowers function definitions into the uniform [`FunctionSpan`] model the
//! stub engine consumes.

use super::{FunctionSpan, StatementKind, SyntaxCheck, stubs};
use tree_sitter::{Node, Parser, Tree};

fn python_parser() -> Option<Parser> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_python::LANGUAGE.into()).ok()?;
    Some(parser)
}

fn parse(code: &str) -> Option<Tree> {
    python_parser()?.parse(code, None)
}

/// Parse-based validation of Python source
///
/// Valid input yields no issues; invalid input yields a
/// `"Syntax error: ..."` entry pointing at the first offending line.
pub fn check_python(code: &str) -> SyntaxCheck {
    let Some(tree) = parse(code) else {
        return SyntaxCheck::invalid("Syntax error: parser unavailable");
    };

    let root = tree.root_node();
    if !root.has_error() {
        return SyntaxCheck::valid();
    }

    match first_error(root) {
        Some(node) if node.is_missing() => SyntaxCheck::invalid(format!(
            "Syntax error: missing '{}' at line {}",
            node.kind(),
            node.start_position().row + 1
        )),
        Some(node) => SyntaxCheck::invalid(format!(
            "Syntax error: invalid syntax at line {}",
            node.start_position().row + 1
        )),
        None => SyntaxCheck::invalid("Syntax error: invalid syntax"),
    }
}

/// Depth-first search for the first ERROR or MISSING node
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

/// Lower every function definition into a [`FunctionSpan`]
///
/// Returns `None` when the source does not parse; stub analysis cannot
/// proceed on broken input and degrades gracefully instead of guessing.
pub fn collect_functions(code: &str) -> Option<Vec<FunctionSpan>> {
    let tree = parse(code)?;
    let root = tree.root_node();
    if root.has_error() {
        return None;
    }

    let mut nodes = Vec::new();
    collect_defs(root, &mut nodes);

    let mut spans = Vec::new();
    for node in nodes {
        if let Some(span) = lower_function(node, code) {
            spans.push(span);
        }
    }
    Some(spans)
}

fn collect_defs<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "function_definition" {
            out.push(child);
        }
        collect_defs(child, out);
    }
}

fn lower_function(node: Node, code: &str) -> Option<FunctionSpan> {
    let name_node = node.child_by_field_name("name")?;
    let body_node = node.child_by_field_name("body")?;

    let name = name_node.utf8_text(code.as_bytes()).ok()?.to_string();
    let source = node.utf8_text(code.as_bytes()).ok()?.to_string();
    let body = body_node.utf8_text(code.as_bytes()).ok()?.to_string();
    let signature = code.get(node.start_byte()..body_node.start_byte())?.trim_end().to_string();

    let body_statements = body_statement_kinds(body_node);
    let is_stub = stubs::is_stub_body(&body_statements, &body);

    Some(FunctionSpan {
        name,
        signature,
        body,
        source,
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        body_statements,
        is_stub,
    })
}

/// Classify the direct statements of a function body
fn body_statement_kinds(body: Node) -> Vec<StatementKind> {
    let mut kinds = Vec::new();
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        let kind = match child.kind() {
            "pass_statement" => StatementKind::Pass,
            "comment" => StatementKind::Comment,
            "expression_statement" => match child.named_child(0).map(|n| n.kind()) {
                Some("ellipsis") => StatementKind::Ellipsis,
                Some("string") => StatementKind::StringLiteral,
                _ => StatementKind::Other,
            },
            _ => StatementKind::Other,
        };
        kinds.push(kind);
    }
    kinds
}
