use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-schema-like field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
}

/// Plugin categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Input,
    Llm,
    Background,
    Action,
    Hook,
}

/// One configurable field discovered on a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub required: bool,
    #[serde(rename = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

/// One discovered component type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    #[serde(rename = "type")]
    pub type_name: String,
    pub category: Category,
    pub fields: Vec<FieldDescriptor>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_name: Option<String>,
}

/// An async entry point in a hook module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookFunction {
    pub name: String,
    pub args: Vec<String>,
}

/// A hook module and its entry points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookModule {
    pub module: String,
    pub functions: Vec<HookFunction>,
}

/// The assembled schema document - five fixed category keys
#[derive(Debug, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub agent_inputs: Vec<ComponentDescriptor>,
    pub cortex_llm: Vec<ComponentDescriptor>,
    pub backgrounds: Vec<ComponentDescriptor>,
    pub agent_actions: Vec<ComponentDescriptor>,
    pub lifecycle_hooks: Vec<HookModule>,
}

impl FieldDescriptor {
    pub fn new(name: &str, field_type: FieldType, default: Option<Value>) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            label: title_label(name),
            required: default.is_some(),
            default_value: default,
        }
    }

    /// Build a descriptor inferring the type from the literal default:
    /// bool -> boolean, int/float -> number, anything else -> string
    pub fn from_default(name: &str, default: Option<Value>) -> Self {
        let field_type = match &default {
            Some(Value::Bool(_)) => FieldType::Boolean,
            Some(Value::Number(_)) => FieldType::Number,
            _ => FieldType::String,
        };
        Self::new(name, field_type, default)
    }
}

/// Insert or override by field name. An override keeps the position of the
/// first occurrence; field identity within a component is the name.
pub fn merge_fields(
    fields: &mut Vec<FieldDescriptor>,
    extra: impl IntoIterator<Item = FieldDescriptor>,
) {
    for field in extra {
        match fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => fields.push(field),
        }
    }
}

/// Derive a display label from a field name: underscores become spaces and
/// every word is title-cased ("api_key" -> "Api Key")
fn title_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len());
    let mut start_of_word = true;

    for ch in name.chars() {
        if ch == '_' {
            label.push(' ');
            start_of_word = true;
        } else if ch.is_alphabetic() {
            if start_of_word {
                label.extend(ch.to_uppercase());
            } else {
                label.extend(ch.to_lowercase());
            }
            start_of_word = false;
        } else {
            label.push(ch);
            start_of_word = true;
        }
    }

    label
}
