use bytes::Bytes;
use filedrop_protocol::FileAction;

/// One candidate file in an upload batch.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    /// File name, unique within a batch for matching purposes.
    pub name: String,
    /// Raw bytes. Empty for files that only exist server-side.
    pub payload: Bytes,
    pub action: FileAction,
    /// True when the file already exists server-side (editing a stored record).
    pub is_clone: bool,
    /// Existing server folder, set for clones.
    pub file_path: Option<String>,
    /// 0–100, updated in place while the file uploads.
    pub progress_percent: u8,
}

impl FileDescriptor {
    /// A freshly selected local file.
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
            action: FileAction::New,
            is_clone: false,
            file_path: None,
            progress_percent: 0,
        }
    }

    /// A file already stored on the server, re-presented for editing.
    pub fn stored(name: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Bytes::new(),
            action: FileAction::Keep,
            is_clone: true,
            file_path: Some(file_path.into()),
            progress_percent: 0,
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// True for descriptors a pipeline run will upload.
    pub fn is_uploadable(&self) -> bool {
        self.action == FileAction::New
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_descriptor_defaults() {
        let file = FileDescriptor::new("a.txt", &b"abc"[..]);
        assert_eq!(file.action, FileAction::New);
        assert!(!file.is_clone);
        assert_eq!(file.size(), 3);
        assert_eq!(file.progress_percent, 0);
        assert!(file.is_uploadable());
    }

    #[test]
    fn stored_descriptor_is_clone() {
        let file = FileDescriptor::stored("a.txt", "docs/2024");
        assert_eq!(file.action, FileAction::Keep);
        assert!(file.is_clone);
        assert_eq!(file.file_path.as_deref(), Some("docs/2024"));
        assert!(!file.is_uploadable());
    }
}
