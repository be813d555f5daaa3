//! Upload error types.

use std::fmt;

use filedrop_protocol::RemoteFile;

use crate::transport::TransportError;

/// Phase of the pipeline a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Delete,
    File,
    Chunk,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadPhase::Delete => write!(f, "delete phase"),
            UploadPhase::File => write!(f, "file phase"),
            UploadPhase::Chunk => write!(f, "chunk phase"),
        }
    }
}

/// Why a run aborted at one unit.
#[derive(Debug, thiserror::Error)]
pub enum AbortReason {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error("backend reported failure: {0}")]
    Backend(String),

    #[error("reply carried no file record")]
    EmptyReply,
}

/// Errors produced by a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("destination folder path is blank")]
    EmptyFolderPath,

    #[error("{phase} aborted at {file}: {reason}")]
    Aborted {
        phase: UploadPhase,
        file: String,
        reason: AbortReason,
        /// Entries the backend acknowledged before the abort. Diagnostics
        /// only — from the caller's point of view nothing in the run is
        /// guaranteed persisted.
        synced: Vec<RemoteFile>,
    },
}
