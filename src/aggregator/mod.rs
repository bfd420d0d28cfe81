//! File aggregation.
//!
//! Reads an ordered list of input files and writes them into a single
//! output file, each preceded by a `=== File: <path> ===` header. Inputs
//! that cannot be read are replaced by an inline error marker; only a
//! failure on the output file aborts the run.

pub mod reader;
pub mod writer;

pub use reader::read_input;
pub use writer::write_blocks;

use crate::error::AggregateError;
use crate::models::AggregateSummary;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options for an aggregation run.
#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    /// Whether to draw a progress bar on stderr.
    pub show_progress: bool,
}

/// Concatenates input files into one output file.
pub struct Aggregator {
    options: AggregateOptions,
}

impl Aggregator {
    /// Create a new aggregator.
    pub fn new(options: AggregateOptions) -> Self {
        Self { options }
    }

    /// Write every input, in order, into `output`.
    ///
    /// The output is truncated before any input is read, so a run never
    /// appends to a previous one.
    pub fn run(
        &self,
        inputs: &[PathBuf],
        output: &Path,
    ) -> Result<AggregateSummary, AggregateError> {
        info!("Aggregating {} files into {}", inputs.len(), output.display());

        let file = File::create(output).map_err(|source| AggregateError::CreateOutput {
            path: output.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        let progress_bar = self.progress_bar(inputs.len());

        let written = write_blocks(&mut writer, inputs, |record| {
            if let Some(ref pb) = progress_bar {
                pb.set_message(record.path.display().to_string());
                pb.inc(1);
            }
        })
        .and_then(|records| writer.flush().map(|()| records));

        // Cleared on success and on failure.
        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        let records = written.map_err(|source| AggregateError::WriteOutput {
            path: output.to_path_buf(),
            source,
        })?;

        let summary = AggregateSummary::from_records(output, &records);
        debug!(
            "Wrote {} bytes ({} ok, {} failed)",
            summary.bytes_written, summary.succeeded, summary.failed
        );

        Ok(summary)
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.options.show_progress || len == 0 {
            return None;
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    }
}

/// Aggregate `inputs` into `output` with default options.
#[allow(dead_code)] // Convenience entry point; the binary configures options itself
pub fn aggregate(inputs: &[PathBuf], output: &Path) -> Result<AggregateSummary, AggregateError> {
    Aggregator::new(AggregateOptions::default()).run(inputs, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn header(path: &Path) -> String {
        format!("=== File: {} ===", path.display())
    }

    #[test]
    fn test_aggregate_headers_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let inputs: Vec<PathBuf> = ["one.txt", "two.txt", "three.txt"]
            .iter()
            .map(|name| {
                let path = temp_dir.path().join(name);
                std::fs::write(&path, format!("content of {}", name)).unwrap();
                path
            })
            .collect();
        let output = temp_dir.path().join("out.txt");

        let summary = aggregate(&inputs, &output).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();

        assert_eq!(text.matches("=== File: ").count(), 3);
        let positions: Vec<usize> = inputs
            .iter()
            .map(|p| text.find(&header(p)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.bytes_written, text.len());
    }

    #[test]
    fn test_aggregate_empty_input_creates_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.txt");

        let summary = aggregate(&[], &output).unwrap();

        assert_eq!(std::fs::metadata(&output).unwrap().len(), 0);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_aggregate_body_is_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("hello.txt");
        std::fs::write(&input, "hello\nworld").unwrap();
        let output = temp_dir.path().join("out.txt");

        aggregate(&[input.clone()], &output).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(text, format!("\n\n{}\nhello\nworld", header(&input)));
    }

    #[test]
    fn test_aggregate_recovers_from_unreadable_input() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");
        let after = temp_dir.path().join("after.txt");
        std::fs::write(&after, "after").unwrap();
        let output = temp_dir.path().join("out.txt");

        let summary = aggregate(&[missing.clone(), after.clone()], &output).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let start = text.find(&header(&missing)).unwrap() + header(&missing).len() + 1;
        let missing_body = &text[start..];
        assert!(missing_body.starts_with("[Error reading file]: "));
        assert!(text.ends_with(&format!("{}\nafter", header(&after))));
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failed_paths, vec![missing]);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.txt");
        std::fs::write(&input, "stable").unwrap();
        let missing = temp_dir.path().join("gone.txt");
        let output = temp_dir.path().join("out.txt");
        let inputs = vec![input, missing];

        aggregate(&inputs, &output).unwrap();
        let first = std::fs::read(&output).unwrap();
        aggregate(&inputs, &output).unwrap();
        let second = std::fs::read(&output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_aggregate_truncates_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.txt");
        std::fs::write(&output, "stale content from an older run").unwrap();

        aggregate(&[], &output).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn test_aggregate_duplicates_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("dup.txt");
        std::fs::write(&input, "x").unwrap();
        let output = temp_dir.path().join("out.txt");

        let summary = aggregate(&[input.clone(), input.clone()], &output).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(text.matches(&header(&input)).count(), 2);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_aggregate_output_failure_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("no_such_dir").join("out.txt");

        let err = aggregate(&[], &output).unwrap_err();

        assert!(matches!(err, AggregateError::CreateOutput { .. }));
        assert_eq!(err.path(), &output);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_aggregator_write_failure_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.txt");
        std::fs::write(&input, "does not fit").unwrap();
        let output = PathBuf::from("/dev/full");

        let aggregator = Aggregator::new(AggregateOptions { show_progress: true });
        let err = aggregator.run(&[input], &output).unwrap_err();

        assert!(matches!(err, AggregateError::WriteOutput { .. }));
        assert_eq!(err.path(), &output);
    }

    #[test]
    fn test_aggregator_with_progress() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.txt");
        std::fs::write(&input, "a").unwrap();
        let output = temp_dir.path().join("out.txt");

        let aggregator = Aggregator::new(AggregateOptions { show_progress: true });
        let summary = aggregator.run(&[input], &output).unwrap();

        assert_eq!(summary.succeeded, 1);
    }
}
