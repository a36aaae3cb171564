pub mod extract;
pub mod parser;
pub mod pipeline;

// Re-export commonly used types
pub use parser::PythonParser;
pub use pipeline::schema::SchemaDocument;
pub use pipeline::SchemaGenerator;
