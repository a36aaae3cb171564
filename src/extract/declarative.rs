use tree_sitter::Node;

use super::{literal_value, node_text, top_level};
use crate::pipeline::schema::{FieldDescriptor, FieldType};

/// Attribute names that carry model plumbing rather than configuration
const RESERVED_NAMES: &[&str] = &["model_config"];

/// Extract fields from a declarative config class's annotated attributes,
/// located by exact class name at module top level. Attributes whose default
/// is a call expression (factory defaults and the like) are dropped
/// entirely; a meaningless placeholder default would be worse than no field.
pub fn declarative_fields(root: Node, source: &str, class_name: &str) -> Vec<FieldDescriptor> {
    let mut fields = Vec::new();

    let Some(class_node) = find_class(root, source, class_name) else {
        return fields;
    };
    let Some(body) = class_node.child_by_field_name("body") else {
        return fields;
    };

    for statement in top_level(body) {
        let Some(assignment) = annotated_assignment(statement) else {
            continue;
        };

        let Some(target) = assignment
            .child_by_field_name("left")
            .filter(|n| n.kind() == "identifier")
        else {
            continue;
        };
        let name = node_text(target, source);
        if name.starts_with('_') || RESERVED_NAMES.contains(&name) {
            continue;
        }

        let field_type = assignment
            .child_by_field_name("type")
            .map(|annotation| annotation_type(annotation, source))
            .unwrap_or(FieldType::String);

        let default = match assignment.child_by_field_name("right") {
            Some(value) if value.kind() == "call" => continue,
            Some(value) => literal_value(value, source),
            None => None,
        };

        fields.push(FieldDescriptor::new(name, field_type, default));
    }

    fields
}

/// A top-level class definition with the given name
fn find_class<'t>(root: Node<'t>, source: &str, class_name: &str) -> Option<Node<'t>> {
    top_level(root).into_iter().find(|node| {
        node.kind() == "class_definition"
            && node
                .child_by_field_name("name")
                .is_some_and(|name| node_text(name, source) == class_name)
    })
}

/// An assignment statement carrying a type annotation
fn annotated_assignment(statement: Node) -> Option<Node> {
    if statement.kind() != "expression_statement" {
        return None;
    }
    statement
        .named_child(0)
        .filter(|n| n.kind() == "assignment" && n.child_by_field_name("type").is_some())
}

/// Map a type annotation to a schema type. Recognized primitives keep their
/// scalar type even inside a single-parameter generic like `Optional[str]`;
/// any other subscripted shape is a container and maps to "object".
fn annotation_type(annotation: Node, source: &str) -> FieldType {
    let Some(expr) = annotation.named_child(0) else {
        return FieldType::String;
    };

    match expr.kind() {
        "identifier" => primitive_type(node_text(expr, source)).unwrap_or(FieldType::String),
        // Inside a `type` field the grammar produces generic_type for
        // Optional[int] and friends; subscript still appears for
        // attribute-headed forms like T.Optional[str]
        "generic_type" | "subscript" => {
            match generic_parameters(expr).as_slice() {
                [single] if single.kind() == "identifier" => {
                    primitive_type(node_text(*single, source)).unwrap_or(FieldType::Object)
                }
                // Multi-parameter generics (Dict[str, str], Tuple[int, int])
                // are containers regardless of what their parameters are
                _ => FieldType::Object,
            }
        }
        _ => FieldType::String,
    }
}

/// Parameter expressions of a generic annotation
fn generic_parameters(expr: Node) -> Vec<Node> {
    let mut params = Vec::new();

    match expr.kind() {
        "generic_type" => {
            let mut cursor = expr.walk();
            let list = expr
                .named_children(&mut cursor)
                .find(|n| n.kind() == "type_parameter");
            if let Some(list) = list {
                let mut inner = list.walk();
                for parameter in list.named_children(&mut inner) {
                    if parameter.kind() == "type" {
                        if let Some(value) = parameter.named_child(0) {
                            params.push(value);
                        }
                    }
                }
            }
        }
        "subscript" => {
            let mut cursor = expr.walk();
            params.extend(expr.children_by_field_name("subscript", &mut cursor));
        }
        _ => {}
    }

    params
}

fn primitive_type(name: &str) -> Option<FieldType> {
    match name {
        "str" | "string" => Some(FieldType::String),
        "int" | "float" => Some(FieldType::Number),
        "bool" => Some(FieldType::Boolean),
        _ => None,
    }
}
