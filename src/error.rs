//! Errors raised while combining and persisting karabiner.json

use std::io;
use std::path::PathBuf;

use crate::document::PathFault;

/// Failures of the combine procedure.
///
/// Every variant carries the file it concerns. None of them are retried:
/// the first error aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    /// A file does not exist or cannot be opened for reading
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file is not well-formed JSON
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The body document lacks the rules array
    #[error("Unexpected structure in {}: {fault}", path.display())]
    Structure { path: PathBuf, fault: PathFault },

    /// A destination cannot be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CombineError {
    /// The file this error concerns
    pub fn path(&self) -> &PathBuf {
        match self {
            CombineError::Read { path, .. }
            | CombineError::Parse { path, .. }
            | CombineError::Structure { path, .. }
            | CombineError::Write { path, .. } => path,
        }
    }
}
