//! Data types for the upload flow.

use filedrop_protocol::RemoteFile;

/// Where one pipeline run sends its files.
#[derive(Debug, Clone)]
pub struct Destination {
    /// Backend folder the files land in. Must not be blank.
    pub folder_path: String,
    pub upload_url: String,
    pub delete_url: String,
    /// Tells the backend to stage changes until an outer form submit
    /// commits them, instead of finalizing each file immediately.
    pub defer_commit: bool,
}

/// Progress event emitted while a run executes.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// Per-file progress update.
    Progress { name: String, percent: u8 },
    /// Run finished; every entry acknowledged.
    Completed { files: usize },
    /// Run aborted.
    Failed { error: String },
}

/// Aggregate result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    /// Acknowledged entries in phase order: deletions, small files, large
    /// files, pass-through.
    pub entries: Vec<RemoteFile>,
    /// Echoed from the request.
    pub folder_path: String,
}
