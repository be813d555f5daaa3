//! Upload batch bookkeeping.
//!
//! An [`UploadBatch`] owns the candidate files the surrounding application
//! has selected: it validates additions against configured limits, loads
//! accepted payloads into memory, and tracks each file's lifecycle state
//! (new, marked for deletion, already stored) until a pipeline run consumes
//! the batch.

mod batch;
mod descriptor;

pub use batch::{BatchOptions, UploadBatch};
pub use descriptor::FileDescriptor;

/// Errors produced while adding candidates to a batch.
///
/// Each rejected candidate yields its own value; one bad file never stops
/// the evaluation of the rest of a selection.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("cannot select more than {max} files")]
    TooManyFiles { max: usize },

    #[error("file type of {name} is not allowed (accepts {accept})")]
    UnsupportedExtension { name: String, accept: String },

    #[error("{name} already exists on the server")]
    DuplicateName { name: String },

    #[error("{name} exceeds the {max_mb} MB size limit")]
    TooLarge { name: String, max_mb: u64 },

    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
