use tree_sitter::Node;

use super::{node_text, top_level};

/// True if the class lists any of `markers` as a direct base, either bare
/// (`class Camera(Sensor)`) or as the subject of a generic subscript
/// (`class Camera(FuserInput[str])`).
///
/// Matching is purely textual. A base imported under an alias has a
/// different local name and will not match; this is a permanent limitation
/// of scanning without symbol resolution.
pub fn extends(class_node: Node, source: &str, markers: &[&str]) -> bool {
    base_names(class_node, source)
        .iter()
        .any(|base| markers.contains(&base.as_str()))
}

/// True if any base name contains "Connector"
pub fn extends_connector(class_node: Node, source: &str) -> bool {
    base_names(class_node, source)
        .iter()
        .any(|base| base.contains("Connector"))
}

/// The class's declared name
pub fn class_name<'a>(class_node: Node, source: &'a str) -> Option<&'a str> {
    class_node
        .child_by_field_name("name")
        .map(|name| node_text(name, source))
}

/// Top-level class definitions in a module
pub fn module_classes(root: Node) -> Vec<Node> {
    top_level(root)
        .into_iter()
        .filter(|node| node.kind() == "class_definition")
        .collect()
}

/// Base identifiers from the superclass list. Keyword arguments (metaclass
/// and friends) and anything that is not a plain or subscripted identifier
/// are skipped.
fn base_names(class_node: Node, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let Some(superclasses) = class_node.child_by_field_name("superclasses") else {
        return names;
    };

    let mut cursor = superclasses.walk();
    for base in superclasses.named_children(&mut cursor) {
        match base.kind() {
            "identifier" => names.push(node_text(base, source).to_string()),
            "subscript" => {
                if let Some(value) = base
                    .child_by_field_name("value")
                    .filter(|v| v.kind() == "identifier")
                {
                    names.push(node_text(value, source).to_string());
                }
            }
            _ => {}
        }
    }

    names
}
