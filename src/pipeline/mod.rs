use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tree_sitter::Node;

pub mod discovery;
pub mod schema;

use crate::extract::{classes, declarative, docstring, fields, hooks};
use crate::parser::{ParsedFile, PythonParser};
use schema::{Category, ComponentDescriptor, HookModule, SchemaDocument};

/// Base-class names recognized per category. Matching is textual; a marker
/// imported under an alias is not recognized.
const INPUT_MARKERS: &[&str] = &["FuserInput", "Sensor"];
const LLM_MARKERS: &[&str] = &["LLM"];
const BACKGROUND_MARKERS: &[&str] = &["Background"];

/// Declarative base class whose fields seed every LLM component
const LLM_CONFIG_CLASS: &str = "LLMConfig";

/// Scans an agent codebase and assembles its configuration schema.
///
/// The scan is a single synchronous pass: parse failures in one file are
/// logged and that file contributes nothing; only assembly and output
/// failures abort the run.
pub struct SchemaGenerator {
    root: PathBuf,
    inputs_dir: PathBuf,
    llm_dir: PathBuf,
    llm_config_path: PathBuf,
    backgrounds_dir: PathBuf,
    actions_dir: PathBuf,
    hooks_dir: PathBuf,
}

impl SchemaGenerator {
    pub fn new(root: &Path) -> Self {
        let src = root.join("src");
        Self {
            root: root.to_path_buf(),
            inputs_dir: src.join("inputs/plugins"),
            llm_dir: src.join("llm/plugins"),
            llm_config_path: src.join("llm/__init__.py"),
            backgrounds_dir: src.join("backgrounds/plugins"),
            actions_dir: src.join("actions"),
            hooks_dir: src.join("hooks"),
        }
    }

    /// Run the full scan and write the schema document under the root.
    /// Returns the path of the written file.
    pub fn generate(&self) -> Result<PathBuf> {
        let document = self.build_document()?;

        let schema_path = self.root.join("config_schema.json5");
        let rendered = serde_json::to_string_pretty(&document)
            .context("Failed to serialize schema document")?;
        std::fs::write(&schema_path, rendered)
            .with_context(|| format!("Failed to write {}", schema_path.display()))?;

        Ok(schema_path)
    }

    /// Scan all five categories and assemble the document. Categories are
    /// independent; nothing is validated or deduplicated across them.
    pub fn build_document(&self) -> Result<SchemaDocument> {
        let mut parser = PythonParser::new()?;

        let document = SchemaDocument {
            agent_inputs: self.scan_plugins(&mut parser, &self.inputs_dir, INPUT_MARKERS, Category::Input),
            cortex_llm: self.scan_llms(&mut parser),
            backgrounds: self.scan_plugins(
                &mut parser,
                &self.backgrounds_dir,
                BACKGROUND_MARKERS,
                Category::Background,
            ),
            agent_actions: self.scan_actions(&mut parser),
            lifecycle_hooks: self.scan_hooks(&mut parser),
        };

        eprintln!(
            "Extracted {} inputs, {} LLMs, {} backgrounds, {} actions, {} hook modules",
            document.agent_inputs.len(),
            document.cortex_llm.len(),
            document.backgrounds.len(),
            document.agent_actions.len(),
            document.lifecycle_hooks.len(),
        );

        Ok(document)
    }

    /// Generic scan for a plugins directory: every class extending one of
    /// the markers becomes a component with its getattr-extracted fields
    fn scan_plugins(
        &self,
        parser: &mut PythonParser,
        dir: &Path,
        markers: &[&str],
        category: Category,
    ) -> Vec<ComponentDescriptor> {
        let mut results = Vec::new();

        for path in discovery::python_files(dir) {
            let Some(parsed) = parse_logged(parser, &path) else {
                continue;
            };
            for class_node in classes::module_classes(parsed.tree.root_node()) {
                if classes::extends(class_node, &parsed.source, markers) {
                    let field_list = fields::getattr_fields(class_node, &parsed.source);
                    results.push(component(class_node, &parsed.source, category, field_list));
                }
            }
        }

        results
    }

    /// LLM components start from the LLMConfig declarative fields, then each
    /// class's own getattr reads override by name. This merge is a one-off
    /// rule for the LLM category, not a general mechanism.
    fn scan_llms(&self, parser: &mut PythonParser) -> Vec<ComponentDescriptor> {
        let mut results = Vec::new();
        if !self.llm_dir.exists() {
            return results;
        }

        let base_fields = self.llm_base_fields(parser);

        for path in discovery::python_files(&self.llm_dir) {
            let Some(parsed) = parse_logged(parser, &path) else {
                continue;
            };
            for class_node in classes::module_classes(parsed.tree.root_node()) {
                if classes::extends(class_node, &parsed.source, LLM_MARKERS) {
                    let mut field_list = base_fields.clone();
                    schema::merge_fields(
                        &mut field_list,
                        fields::getattr_fields(class_node, &parsed.source),
                    );
                    results.push(component(
                        class_node,
                        &parsed.source,
                        Category::Llm,
                        field_list,
                    ));
                }
            }
        }

        results
    }

    fn llm_base_fields(&self, parser: &mut PythonParser) -> Vec<schema::FieldDescriptor> {
        if !self.llm_config_path.exists() {
            return Vec::new();
        }
        match parse_logged(parser, &self.llm_config_path) {
            Some(parsed) => {
                declarative::declarative_fields(parsed.tree.root_node(), &parsed.source, LLM_CONFIG_CLASS)
            }
            None => Vec::new(),
        }
    }

    /// Scan per-action connector directories. Each Connector subclass
    /// becomes an action component named after its action and connector.
    fn scan_actions(&self, parser: &mut PythonParser) -> Vec<ComponentDescriptor> {
        let mut results = Vec::new();

        for action_dir in discovery::subdirs(&self.actions_dir) {
            let action_name = discovery::file_stem(&action_dir).to_string();
            let connector_dir = action_dir.join("connector");
            if !connector_dir.exists() {
                continue;
            }

            for path in discovery::python_files(&connector_dir) {
                let Some(parsed) = parse_logged(parser, &path) else {
                    continue;
                };
                for class_node in classes::module_classes(parsed.tree.root_node()) {
                    if !classes::extends_connector(class_node, &parsed.source) {
                        continue;
                    }
                    let connector = discovery::file_stem(&path);
                    let field_list = fields::getattr_fields(class_node, &parsed.source);

                    let mut descriptor =
                        component(class_node, &parsed.source, Category::Action, field_list);
                    descriptor.type_name = connector_type_name(&action_name, connector);
                    descriptor.action_name = Some(action_name.clone());
                    descriptor.connector_name = Some(connector.to_string());
                    results.push(descriptor);
                }
            }
        }

        results
    }

    /// Scan hook modules for async entry points. Modules without any
    /// qualifying function contribute nothing.
    fn scan_hooks(&self, parser: &mut PythonParser) -> Vec<HookModule> {
        let mut results = Vec::new();

        for path in discovery::python_files(&self.hooks_dir) {
            let Some(parsed) = parse_logged(parser, &path) else {
                continue;
            };
            let functions = hooks::async_functions(parsed.tree.root_node(), &parsed.source);
            if functions.is_empty() {
                continue;
            }
            results.push(HookModule {
                module: discovery::file_stem(&path).to_string(),
                functions,
            });
        }

        results
    }
}

/// Compose the public type name for an action connector. The default
/// connector takes the action's own name; every other connector is suffixed.
pub fn connector_type_name(action: &str, connector: &str) -> String {
    if connector == "default" {
        action.to_string()
    } else {
        format!("{}_{}", action, connector)
    }
}

/// Parse a file, logging and swallowing per-file failures so the scan can
/// continue without it
fn parse_logged(parser: &mut PythonParser, path: &Path) -> Option<ParsedFile> {
    match parser.parse_file(path) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            eprintln!("Error parsing {}: {:#}", path.display(), e);
            None
        }
    }
}

fn component(
    class_node: Node,
    source: &str,
    category: Category,
    field_list: Vec<schema::FieldDescriptor>,
) -> ComponentDescriptor {
    ComponentDescriptor {
        type_name: classes::class_name(class_node, source)
            .unwrap_or_default()
            .to_string(),
        category,
        fields: field_list,
        description: docstring(class_node, source).unwrap_or_default(),
        action_name: None,
        connector_name: None,
    }
}
