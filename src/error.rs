//! Fatal error types.
//!
//! Only failures on the output file are errors. A failed input read is
//! recovered in place and recorded as a [`crate::models::ReadFailure`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    /// The destination file could not be created or truncated.
    #[error("failed to create output file {}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing or flushing the destination failed part way through.
    #[error("failed to write output file {}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AggregateError {
    pub fn path(&self) -> &PathBuf {
        match self {
            AggregateError::CreateOutput { path, .. } | AggregateError::WriteOutput { path, .. } => {
                path
            }
        }
    }
}
