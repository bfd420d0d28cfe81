//! fileconcat - concatenate files into one annotated text bundle
//!
//! Reads an ordered list of files and writes their contents, each
//! preceded by a `=== File: <path> ===` header, into a single output file.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Fatal error (bad config, output file could not be written)
//!   2 - --strict was set and at least one input could not be read

mod aggregator;
mod cli;
mod config;
mod error;
mod models;

use aggregator::{AggregateOptions, Aggregator};
use anyhow::{Context, Result};
use cli::{Args, SummaryFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use error::AggregateError;
use models::AggregateSummary;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config(Path::new(".")) {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    match run(args) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            if let Some(agg) = e.downcast_ref::<AggregateError>() {
                error!(path = %agg.path().display(), "Aggregation failed: {:#}", e);
            } else {
                error!("Run failed: {:#}", e);
            }
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .fileconcat.toml in `dir`.
fn handle_init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(DEFAULT_CONFIG_FILE);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            path.display()
        );
    }

    let content = Config::default_toml();
    std::fs::write(&path, &content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {} with default settings.", path.display());
    println!("   List the files to concatenate under [bundle] inputs.");
    Ok(path)
}

/// Initialize logging. Logs go to stderr; stdout carries only results.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Load config, then aggregate. Returns the process exit code.
fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };
    init_logging(level);

    info!("fileconcat v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    execute(&args, &config)
}

/// Dry-run or aggregate with the merged configuration.
fn execute(args: &Args, config: &Config) -> Result<i32> {
    let inputs = &config.bundle.inputs;
    let output = &config.bundle.output;

    if args.dry_run {
        return Ok(handle_dry_run(inputs, output));
    }

    if inputs.is_empty() {
        warn!("No input files configured; {} will be empty", output.display());
    }

    let aggregator = Aggregator::new(AggregateOptions {
        show_progress: args.show_progress(),
    });
    let summary = aggregator.run(inputs, output)?;

    print_summary(&summary, args.summary)?;

    let code = exit_code(&summary, args.strict);
    if code == 2 {
        eprintln!(
            "\n⛔ {} of {} inputs could not be read. Failing (exit code 2).",
            summary.failed, summary.total
        );
    }

    Ok(code)
}

/// Exit code for a completed run: 2 under --strict when any input failed.
fn exit_code(summary: &AggregateSummary, strict: bool) -> i32 {
    if strict && summary.has_failures() {
        2
    } else {
        0
    }
}

/// Print the completion summary on stdout.
fn print_summary(summary: &AggregateSummary, format: SummaryFormat) -> Result<()> {
    match format {
        SummaryFormat::Json => {
            let json = serde_json::to_string_pretty(summary)
                .context("Failed to serialize summary")?;
            println!("{}", json);
        }
        SummaryFormat::Text => {
            println!("Data saved to {}", summary.output.display());
            println!(
                "   Files: {} | Read: {} | Failed: {} | Bytes: {}",
                summary.total, summary.succeeded, summary.failed, summary.bytes_written
            );
            for path in &summary.failed_paths {
                println!("   ⚠️  {}", path.display());
            }
        }
    }
    Ok(())
}

/// Handle --dry-run: list what would be written, touch nothing.
fn handle_dry_run(inputs: &[PathBuf], output: &Path) -> i32 {
    println!("🔍 Dry run: {} inputs -> {}\n", inputs.len(), output.display());

    if inputs.is_empty() {
        println!("   No input files configured.");
    }

    for path in inputs {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => {
                println!("     📄 {} ({} bytes)", path.display(), meta.len())
            }
            Ok(_) => println!("     ⚠️  {} (not a regular file)", path.display()),
            Err(_) => println!("     ❓ {} (missing)", path.display()),
        }
    }

    println!("\n✅ Dry run complete. Nothing was written.");
    0
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // A manifest that exists but fails to parse is fatal.
    Ok(Config::load_default()?.unwrap_or_default())
}
