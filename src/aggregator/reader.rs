//! Reading a single input file.

use crate::models::{ReadFailure, ReadOutcome};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Read the entire content of `path` as UTF-8 text.
///
/// Line endings are kept byte for byte; `\r\n` and lone `\r` are not
/// rewritten to `\n`.
///
/// This never fails: an unreadable or undecodable file yields
/// [`ReadOutcome::Failed`] and the caller keeps going.
pub fn read_input(path: &Path) -> ReadOutcome {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let failure = ReadFailure::from_io(&e, path);
            warn!(kind = %failure.kind, "Failed to read {}: {}", path.display(), e);
            return ReadOutcome::Failed(failure);
        }
    };

    match String::from_utf8(bytes) {
        Ok(content) => {
            debug!("Read {} ({} bytes)", path.display(), content.len());
            ReadOutcome::Content(content)
        }
        Err(e) => {
            let failure = ReadFailure::invalid_utf8(e.utf8_error().valid_up_to());
            warn!(kind = %failure.kind, "Failed to decode {}: {}", path.display(), failure);
            ReadOutcome::Failed(failure)
        }
    }
}
