use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "spyq",
    version,
    about = "SPYQ - LLM-backed Python code generation and validation",
    long_about = "SPYQ validates Python source quality and generates code through \
                  configured model backends, normalizing and repairing imperfect model \
                  output until it compiles."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the provider configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate code from a natural-language request
    #[command(about = "Generate Python code through the configured model backends")]
    Generate(GenerateArgs),

    /// Check a Python file for syntax errors and stub functions
    #[command(about = "Validate a Python file without calling any model backend")]
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// What to generate
    #[arg(help = "Natural-language description of the code to generate")]
    pub request: String,

    /// Maximum generation iterations
    #[arg(short = 'i', long, default_value_t = 3)]
    pub iterations: u32,

    /// Force a single iteration regardless of --iterations
    #[arg(long)]
    pub fast: bool,

    /// Write generated code to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Python file to check
    pub file: PathBuf,
}
