use tree_sitter::Node;

use super::{node_text, top_level};
use crate::pipeline::schema::HookFunction;

/// Collect top-level async functions with their positional parameter names.
/// Synchronous functions and anything nested inside another definition are
/// ignored.
pub fn async_functions(root: Node, source: &str) -> Vec<HookFunction> {
    let mut functions = Vec::new();

    for node in top_level(root) {
        if node.kind() != "function_definition" || !is_async(node, source) {
            continue;
        }
        let Some(name) = node.child_by_field_name("name") else {
            continue;
        };
        functions.push(HookFunction {
            name: node_text(name, source).to_string(),
            args: parameter_names(node, source),
        });
    }

    functions
}

/// The `async` keyword sits as an anonymous token ahead of `def`
fn is_async(node: Node, source: &str) -> bool {
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.kind() == "def" {
                break;
            }
            if node_text(child, source) == "async" {
                return true;
            }
        }
    }
    false
}

/// Ordered positional parameter names. Collection stops at the first splat
/// or keyword-only marker; parameters past it are not positional.
fn parameter_names(node: Node, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let Some(parameters) = node.child_by_field_name("parameters") else {
        return names;
    };

    let mut cursor = parameters.walk();
    for parameter in parameters.named_children(&mut cursor) {
        match parameter.kind() {
            "identifier" => names.push(node_text(parameter, source).to_string()),
            "typed_parameter" => {
                if let Some(name) = parameter.named_child(0).filter(|n| n.kind() == "identifier") {
                    names.push(node_text(name, source).to_string());
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = parameter.child_by_field_name("name") {
                    names.push(node_text(name, source).to_string());
                }
            }
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => {}
        }
    }

    names
}
