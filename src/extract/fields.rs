use tree_sitter::Node;

use super::{literal_value, node_text, string_text, top_level};
use crate::pipeline::schema::{self, FieldDescriptor};

/// Extract configuration fields from `getattr(config, "name", default)`
/// calls inside a class's `__init__`. Classes without an `__init__`
/// contribute no fields. Duplicate names collapse to one descriptor with
/// the last occurrence winning.
pub fn getattr_fields(class_node: Node, source: &str) -> Vec<FieldDescriptor> {
    let mut fields = Vec::new();
    let Some(init) = find_init(class_node, source) else {
        return fields;
    };
    collect_reads(init, source, &mut fields);
    fields
}

/// The constructor method, located by its conventional name
fn find_init<'t>(class_node: Node<'t>, source: &str) -> Option<Node<'t>> {
    let body = class_node.child_by_field_name("body")?;
    top_level(body).into_iter().find(|node| {
        node.kind() == "function_definition"
            && node
                .child_by_field_name("name")
                .is_some_and(|name| node_text(name, source) == "__init__")
    })
}

fn collect_reads(node: Node, source: &str, fields: &mut Vec<FieldDescriptor>) {
    if node.kind() == "call" {
        if let Some(field) = match_read_call(node, source) {
            schema::merge_fields(fields, [field]);
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_reads(child, source, fields);
    }
}

/// Accept a call as the field-read idiom iff the callee is the bare name
/// `getattr`, there are at least two positional arguments, the first refers
/// to something literally named `config`, and the second is a string
/// literal. A literal third argument is the default.
fn match_read_call(call: Node, source: &str) -> Option<FieldDescriptor> {
    let callee = call.child_by_field_name("function")?;
    if callee.kind() != "identifier" || node_text(callee, source) != "getattr" {
        return None;
    }

    let args = positional_args(call);
    if args.len() < 2 || !is_config_ref(args[0], source) {
        return None;
    }

    let name = string_text(args[1], source)?;
    let default = args.get(2).and_then(|node| literal_value(*node, source));
    Some(FieldDescriptor::from_default(&name, default))
}

fn positional_args(call: Node) -> Vec<Node> {
    let mut args = Vec::new();
    let Some(list) = call.child_by_field_name("arguments") else {
        return args;
    };
    let mut cursor = list.walk();
    for arg in list.named_children(&mut cursor) {
        if arg.kind() != "keyword_argument" && arg.kind() != "comment" {
            args.push(arg);
        }
    }
    args
}

/// An attribute access ending in `.config`, or the bare variable `config`
fn is_config_ref(node: Node, source: &str) -> bool {
    match node.kind() {
        "identifier" => node_text(node, source) == "config",
        "attribute" => node
            .child_by_field_name("attribute")
            .is_some_and(|attr| node_text(attr, source) == "config"),
        _ => false,
    }
}
