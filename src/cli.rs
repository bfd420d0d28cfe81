//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// fileconcat - concatenate files into one annotated text bundle
///
/// Writes every input file, in order, into a single output file. Each
/// file is preceded by a `=== File: <path> ===` header; files that cannot
/// be read are replaced by an `[Error reading file]` marker.
///
/// With no arguments the input list and output path come from
/// `.fileconcat.toml` in the current directory.
///
/// Examples:
///   fileconcat
///   fileconcat src/main.rs src/lib.rs -o bundle.txt
///   fileconcat --config project.toml --summary json
///   fileconcat --dry-run
///   fileconcat --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Input files, in output order
    ///
    /// Overrides the manifest's input list when given.
    #[arg(value_name = "INPUTS")]
    pub inputs: Vec<PathBuf>,

    /// Output file path (truncated on every run)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .fileconcat.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// How to print the completion summary (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub summary: SummaryFormat,

    /// Exit with code 2 if any input could not be read
    #[arg(long)]
    pub strict: bool,

    /// List the inputs and whether they exist, without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .fileconcat.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Format of the summary printed on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SummaryFormat {
    /// Human-readable lines (default)
    #[default]
    Text,
    /// JSON object
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref output) = self.output {
            if output.as_os_str().is_empty() {
                return Err("Output path must not be empty".to_string());
            }
            if output.is_dir() {
                return Err(format!("Output path is a directory: {}", output.display()));
            }
        }

        if self.inputs.iter().any(|p| p.as_os_str().is_empty()) {
            return Err("Input paths must not be empty".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether the progress bar should be drawn.
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}
