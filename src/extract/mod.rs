//! Syntactic extraction from Python ASTs. Everything here works by node
//! shape alone - no imports are resolved and none of the scanned code runs.

use serde_json::Value;
use tree_sitter::Node;

pub mod classes;
pub mod declarative;
pub mod fields;
pub mod hooks;

/// Text of a node within its source
pub fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Named children of a module or block, with decorated definitions unwrapped
/// to the inner function or class node
pub fn top_level(node: Node) -> Vec<Node> {
    let mut out = Vec::new();
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        if child.kind() == "decorated_definition" {
            if let Some(definition) = child.child_by_field_name("definition") {
                out.push(definition);
                continue;
            }
        }
        out.push(child);
    }

    out
}

/// Body docstring of a class or function: the first statement, when it is a
/// plain string literal
pub fn docstring(node: Node, source: &str) -> Option<String> {
    let body = node.child_by_field_name("body")?;
    let mut cursor = body.walk();
    let first = body.named_children(&mut cursor).next()?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string = first.named_child(0).filter(|n| n.kind() == "string")?;
    string_text(string, source).map(|text| clean_docstring(&text))
}

/// Convert a literal constant node to a JSON value. A `None` literal yields
/// no value, so it behaves like an absent default everywhere `required` is
/// decided. Anything non-literal (calls, names, negated numbers, container
/// displays) also yields no value.
pub fn literal_value(node: Node, source: &str) -> Option<Value> {
    match node.kind() {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "none" => None,
        "integer" => parse_integer(node_text(node, source)),
        "float" => {
            let text = node_text(node, source).replace('_', "");
            text.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
        }
        "string" => string_text(node, source).map(Value::String),
        _ => None,
    }
}

/// The content of a plain string literal node. Interpolated strings are not
/// literals and yield nothing.
pub fn string_text(node: Node, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    // f-strings carry their prefix on the opening token
    if let Some(start) = node.child(0).filter(|n| n.kind() == "string_start") {
        let prefix = node_text(start, source);
        if prefix.contains('f') || prefix.contains('F') {
            return None;
        }
    }

    let mut text = String::new();
    let mut cursor = node.walk();
    for part in node.named_children(&mut cursor) {
        match part.kind() {
            "string_content" => text.push_str(&content_text(part, source)),
            "interpolation" => return None,
            _ => {}
        }
    }
    Some(text)
}

/// String content with escape sequences decoded
fn content_text(content: Node, source: &str) -> String {
    let mut text = String::new();
    let mut pos = content.start_byte();
    let mut cursor = content.walk();

    for child in content.named_children(&mut cursor) {
        if child.kind() != "escape_sequence" {
            continue;
        }
        text.push_str(&source[pos..child.start_byte()]);
        text.push_str(unescape(node_text(child, source)));
        pos = child.end_byte();
    }
    text.push_str(&source[pos..content.end_byte()]);

    text
}

fn unescape(sequence: &str) -> &str {
    match sequence {
        "\\n" => "\n",
        "\\t" => "\t",
        "\\r" => "\r",
        "\\\\" => "\\",
        "\\\"" => "\"",
        "\\'" => "'",
        "\\0" => "\0",
        // Exotic escapes pass through untouched; defaults are not validated
        other => other,
    }
}

/// Integer literals have no fixed width in the scanned language, so values
/// past i64 widen to u64 and then to an approximate float rather than
/// losing the default outright
fn parse_integer(text: &str) -> Option<Value> {
    let text = text.replace('_', "");

    let radix = if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some((digits, 16))
    } else if let Some(digits) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        Some((digits, 8))
    } else if let Some(digits) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        Some((digits, 2))
    } else {
        None
    };

    if let Some((digits, radix)) = radix {
        return i64::from_str_radix(digits, radix)
            .map(serde_json::Number::from)
            .or_else(|_| u64::from_str_radix(digits, radix).map(serde_json::Number::from))
            .ok()
            .map(Value::Number);
    }

    text.parse::<i64>()
        .ok()
        .map(serde_json::Number::from)
        .or_else(|| text.parse::<u64>().ok().map(serde_json::Number::from))
        .or_else(|| text.parse::<f64>().ok().and_then(serde_json::Number::from_f64))
        .map(Value::Number)
}

/// Trim a docstring and strip the common indentation of its later lines
fn clean_docstring(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("").trim();

    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned = first.to_string();
    for line in rest {
        cleaned.push('\n');
        // The offset comes from other lines, so it may not land on a char
        // boundary here; such a line keeps its indentation
        cleaned.push_str(line.get(indent..).unwrap_or(line));
    }
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PythonParser;
    use serde_json::json;

    fn first_expr(source: &str) -> (crate::parser::ParsedFile, &str) {
        let mut parser = PythonParser::new().unwrap();
        (parser.parse(source).unwrap(), source)
    }

    fn literal_of(source: &str) -> Option<Value> {
        let (parsed, src) = first_expr(source);
        let root = parsed.tree.root_node();
        let stmt = root.named_child(0).unwrap();
        let expr = stmt.named_child(0).unwrap();
        literal_value(expr, src)
    }

    #[test]
    fn test_literal_values() {
        assert_eq!(literal_of("True"), Some(json!(true)));
        assert_eq!(literal_of("False"), Some(json!(false)));
        assert_eq!(literal_of("None"), None);
        assert_eq!(literal_of("42"), Some(json!(42)));
        assert_eq!(literal_of("1_000"), Some(json!(1000)));
        assert_eq!(literal_of("0x10"), Some(json!(16)));
        assert_eq!(
            literal_of("18446744073709551615"),
            Some(json!(18446744073709551615u64))
        );
        // Past u64 the default degrades to an approximate float
        assert!(matches!(
            literal_of("340282366920938463463374607431768211456"),
            Some(Value::Number(_))
        ));
        assert_eq!(literal_of("2.5"), Some(json!(2.5)));
        assert_eq!(literal_of("'tick'"), Some(json!("tick")));
        assert_eq!(literal_of("\"a\\nb\""), Some(json!("a\nb")));
    }

    #[test]
    fn test_non_literals_yield_nothing() {
        assert_eq!(literal_of("make_default()"), None);
        assert_eq!(literal_of("-5"), None);
        assert_eq!(literal_of("[1, 2]"), None);
        assert_eq!(literal_of("f\"rate {x}\""), None);
    }

    #[test]
    fn test_docstring_extraction() {
        let source = "class Camera:\n    \"\"\"Reads camera frames.\n\n    Second paragraph.\n    \"\"\"\n    pass\n";
        let (parsed, src) = first_expr(source);
        let class_node = parsed.tree.root_node().named_child(0).unwrap();
        assert_eq!(
            docstring(class_node, src).as_deref(),
            Some("Reads camera frames.\n\nSecond paragraph.")
        );
    }

    #[test]
    fn test_docstring_with_multibyte_indentation() {
        // A continuation line indented with non-breaking spaces must not
        // split a character when the common indent is stripped
        let source =
            "class Camera:\n    \"\"\"Title\n  line one\n \u{a0}line two\n    \"\"\"\n    pass\n";
        let (parsed, src) = first_expr(source);
        let class_node = parsed.tree.root_node().named_child(0).unwrap();
        let text = docstring(class_node, src).unwrap();
        assert!(text.contains("line one"));
        assert!(text.contains("line two"));
    }

    #[test]
    fn test_no_docstring() {
        let source = "class Camera:\n    x = 1\n";
        let (parsed, src) = first_expr(source);
        let class_node = parsed.tree.root_node().named_child(0).unwrap();
        assert_eq!(docstring(class_node, src), None);
    }

    #[test]
    fn test_top_level_unwraps_decorators() {
        let source = "@register\nclass Camera:\n    pass\n\ndef helper():\n    pass\n";
        let (parsed, _src) = first_expr(source);
        let nodes = top_level(parsed.tree.root_node());
        let kinds: Vec<&str> = nodes.iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec!["class_definition", "function_definition"]);
    }
}
