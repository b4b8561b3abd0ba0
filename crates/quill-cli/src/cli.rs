//! Command-line interface definition for Quill.
//!
//! - `quill check` - Report declarations that are missing documentation
//! - `quill fix` - Insert documentation comments in place

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Quill - documentation comments for C# declarations
#[derive(Parser, Debug)]
#[command(
    name = "quill",
    version,
    about = "Find and fill missing C# documentation comments",
    long_about = "Quill scans C# sources for public declarations without a <summary> or\n\
                  <inheritdoc/> comment and inserts an XML documentation header, built from\n\
                  heuristic templates or generated by a local Ollama model."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available Quill subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report declarations that need a documentation header
    ///
    /// Exits with status 1 when at least one declaration is missing its header.
    Check(CheckArgs),

    /// Insert documentation headers in place
    ///
    /// Classes and methods can be sent to a local Ollama model with --llm;
    /// every other declaration uses the heuristic templates.
    Fix(FixArgs),
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Files or directories to scan
    ///
    /// Directories are searched for *.cs files; bin/ and obj/ are skipped.
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Output format for diagnostics
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Only report const fields; other fields are ignored
    #[arg(long)]
    pub const_fields_only: bool,

    /// Path to a quill.config.json file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the fix command
#[derive(Args, Debug, Clone, Default)]
pub struct FixArgs {
    /// Files or directories to document
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Print rewritten sources to stdout instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Save the original as <file>.bak before writing
    #[arg(long)]
    pub backup: bool,

    /// Generate class and method comments with a local Ollama model
    #[arg(long)]
    pub llm: bool,

    /// Ollama model to use with --llm
    #[arg(long, value_name = "MODEL", requires = "llm")]
    pub model: Option<String>,

    /// Ollama server URL
    #[arg(long, value_name = "URL", requires = "llm")]
    pub url: Option<String>,

    /// Fall back to the heuristic templates when the model fails
    #[arg(long)]
    pub fallback: bool,

    /// Only document const fields; other fields are left alone
    #[arg(long)]
    pub const_fields_only: bool,

    /// Maximum number of declarations generated at once
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Path to a quill.config.json file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Output format for `quill check`
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `path:line:column` line per diagnostic
    #[default]
    Text,
    /// A JSON array of diagnostics
    Json,
}
