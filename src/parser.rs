use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::{Parser, Tree};

/// A parsed Python source file with its AST
pub struct ParsedFile {
    pub tree: Tree,
    pub source: String,
}

/// Wrapper around tree-sitter configured for the Python grammar
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .context("Failed to load Python grammar")?;
        Ok(Self { parser })
    }

    /// Parse source text into an AST.
    ///
    /// tree-sitter produces a tree even for broken input, so a root node
    /// containing errors is reported as a parse failure - callers drop the
    /// whole file rather than working from a partial tree.
    pub fn parse(&mut self, source: &str) -> Result<ParsedFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("Parser produced no tree"))?;

        if tree.root_node().has_error() {
            anyhow::bail!("Source contains syntax errors");
        }

        Ok(ParsedFile {
            tree,
            source: source.to_string(),
        })
    }

    /// Read and parse a file from disk
    pub fn parse_file(&mut self, path: &Path) -> Result<ParsedFile> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        self.parse(&source)
    }
}
