//! Data models for the file bundler.
//!
//! This module contains the core data structures used throughout
//! the application for representing per-file read results, output
//! blocks, and the run summary.

use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Prefix written in place of a file's content when it could not be read.
pub const READ_ERROR_PREFIX: &str = "[Error reading file]: ";

/// Classification of a failed input read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadErrorKind {
    /// The path does not exist
    NotFound,
    /// The process may not open the path
    PermissionDenied,
    /// The path names a directory, not a file
    IsADirectory,
    /// The file is not valid UTF-8 text
    InvalidUtf8,
    /// Any other I/O failure
    Other,
}

impl fmt::Display for ReadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadErrorKind::NotFound => write!(f, "not found"),
            ReadErrorKind::PermissionDenied => write!(f, "permission denied"),
            ReadErrorKind::IsADirectory => write!(f, "is a directory"),
            ReadErrorKind::InvalidUtf8 => write!(f, "invalid utf-8"),
            ReadErrorKind::Other => write!(f, "other"),
        }
    }
}

/// A recovered failure reading one input.
///
/// The description never depends on the platform's error message text,
/// so two runs over the same inputs produce identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFailure {
    pub kind: ReadErrorKind,
    pub description: String,
}

impl ReadFailure {
    /// Build a failure from an I/O error raised while opening or reading.
    pub fn from_io(err: &io::Error, path: &Path) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ReadErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => ReadErrorKind::PermissionDenied,
            // Opening a directory succeeds on Unix; the read then fails with an
            // OS-specific error, so fall back to checking the path itself.
            _ if path.is_dir() => ReadErrorKind::IsADirectory,
            _ => ReadErrorKind::Other,
        };

        let description = match kind {
            ReadErrorKind::NotFound => "file not found".to_string(),
            ReadErrorKind::PermissionDenied => "permission denied".to_string(),
            ReadErrorKind::IsADirectory => "is a directory".to_string(),
            _ => format!("I/O error ({:?})", err.kind()),
        };

        Self { kind, description }
    }

    /// Build a failure for content that is not valid UTF-8.
    pub fn invalid_utf8(valid_up_to: usize) -> Self {
        Self {
            kind: ReadErrorKind::InvalidUtf8,
            description: format!("invalid UTF-8 at byte offset {}", valid_up_to),
        }
    }
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// Result of reading a single input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The full text content of the file
    Content(String),
    /// The read failed and was recovered
    Failed(ReadFailure),
}

/// One header/body pair in the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Input path, exactly as supplied
    pub path: PathBuf,
    /// What was read from it
    pub outcome: ReadOutcome,
}

impl Block {
    pub fn new(path: PathBuf, outcome: ReadOutcome) -> Self {
        Self { path, outcome }
    }

    /// Render the header line for this block, with the path's raw bytes.
    pub fn header(&self) -> Vec<u8> {
        let path = path_bytes(&self.path);
        let mut header = Vec::with_capacity(path.len() + 20);
        header.extend_from_slice(b"\n\n=== File: ");
        header.extend_from_slice(&path);
        header.extend_from_slice(b" ===\n");
        header
    }

    /// Render the body: verbatim content, or the inline error marker.
    pub fn body(&self) -> Cow<'_, str> {
        match &self.outcome {
            ReadOutcome::Content(content) => Cow::Borrowed(content),
            ReadOutcome::Failed(failure) => {
                Cow::Owned(format!("{}{}", READ_ERROR_PREFIX, failure))
            }
        }
    }

    /// Number of bytes this block occupies in the output.
    pub fn bytes_written(&self) -> usize {
        let body_len = match &self.outcome {
            ReadOutcome::Content(content) => content.len(),
            ReadOutcome::Failed(failure) => READ_ERROR_PREFIX.len() + failure.description.len(),
        };
        self.header().len() + body_len
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

// Non-Unix paths are not byte strings; fall back to a lossy UTF-8 rendering.
#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

/// Serialize a path as a string, replacing invalid UTF-8 with U+FFFD.
fn serialize_path_lossy<S: Serializer>(
    path: &Path,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn serialize_paths_lossy<S: Serializer>(
    paths: &[PathBuf],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(paths.iter().map(|p| p.to_string_lossy()))
}

/// What remains of a block once it has been written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failure: Option<ReadFailure>,
    pub bytes_written: usize,
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        let failure = match &block.outcome {
            ReadOutcome::Content(_) => None,
            ReadOutcome::Failed(failure) => Some(failure.clone()),
        };
        Self {
            path: block.path.clone(),
            failure,
            bytes_written: block.bytes_written(),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Destination file
    #[serde(serialize_with = "serialize_path_lossy")]
    pub output: PathBuf,
    /// Number of blocks written
    pub total: usize,
    /// Inputs copied verbatim
    pub succeeded: usize,
    /// Inputs replaced by an error marker
    pub failed: usize,
    /// Paths that failed, in input order
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_paths_lossy",
        default
    )]
    pub failed_paths: Vec<PathBuf>,
    /// Size of the output file
    pub bytes_written: usize,
}

impl AggregateSummary {
    /// Compute a summary from the records of blocks written to `output`.
    pub fn from_records(output: &Path, records: &[BlockRecord]) -> Self {
        let failed_paths: Vec<PathBuf> = records
            .iter()
            .filter(|r| r.failure.is_some())
            .map(|r| r.path.clone())
            .collect();

        Self {
            output: output.to_path_buf(),
            total: records.len(),
            succeeded: records.len() - failed_paths.len(),
            failed: failed_paths.len(),
            failed_paths,
            bytes_written: records.iter().map(|r| r.bytes_written).sum(),
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
