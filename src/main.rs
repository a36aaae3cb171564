use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use plugin_schema::SchemaGenerator;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Generate a configuration schema from an agent plugin codebase", long_about = None)]
struct Cli {
    /// Project root to scan
    #[arg(default_value = ".")]
    root: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let schema_path = SchemaGenerator::new(&cli.root).generate()?;
    println!("{} Schema generated: {}", "✓".green(), schema_path.display());

    Ok(())
}
