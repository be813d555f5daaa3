use std::path::{Path, PathBuf};

use filedrop_protocol::FileAction;
use tracing::debug;

use crate::{BatchError, FileDescriptor};

/// Limits applied when candidates are added to a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Comma-separated extension allow-list, e.g. `".jpg, .png"`.
    /// `"*"` accepts everything. Entries are matched against the lowercased
    /// extension, so configure them lowercase.
    pub accept: String,
    /// Allow selecting more than one file at a time.
    pub multi_select: bool,
    /// Maximum files kept at once. `1` puts the batch in single-file mode:
    /// every addition replaces the whole list.
    pub max_files: usize,
    /// Per-file size cap in megabytes.
    pub max_size_mb: u64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            accept: "*".into(),
            multi_select: false,
            max_files: 20,
            max_size_mb: 1000,
        }
    }
}

/// The mutable list of candidate files a pipeline run consumes.
#[derive(Debug, Default)]
pub struct UploadBatch {
    options: BatchOptions,
    files: Vec<FileDescriptor>,
}

impl UploadBatch {
    pub fn new(options: BatchOptions) -> Self {
        Self {
            options,
            files: Vec::new(),
        }
    }

    /// Seeds a batch, typically with [`FileDescriptor::stored`] entries when
    /// editing a record that already has files.
    pub fn with_files(options: BatchOptions, files: Vec<FileDescriptor>) -> Self {
        Self { options, files }
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut [FileDescriptor] {
        &mut self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Adds a selection of local files to the batch.
    ///
    /// Candidates run through an ordered filter chain — count cap, extension
    /// allow-list, duplicate name against stored files, size cap — and every
    /// rejection is reported without stopping the rest of the selection.
    /// Accepted files are read into memory concurrently; once every read has
    /// finished the merged list replaces the batch's list in one assignment.
    pub async fn add_paths(&mut self, paths: &[PathBuf]) -> Vec<BatchError> {
        let mut errors = Vec::new();
        if paths.is_empty() {
            return errors;
        }

        // Count cap rejects the entire selection, not individual files.
        if self.options.multi_select
            && self.options.max_files > 1
            && paths.len() + self.files.len() > self.options.max_files
        {
            errors.push(BatchError::TooManyFiles {
                max: self.options.max_files,
            });
            return errors;
        }

        let accept = parse_accept(&self.options.accept);
        let mut accepted: Vec<(String, PathBuf)> = Vec::new();
        for path in paths {
            let name = file_name(path);
            if let Some(exts) = &accept
                && !has_accepted_extension(&name, exts)
            {
                errors.push(BatchError::UnsupportedExtension {
                    name,
                    accept: self.options.accept.clone(),
                });
                continue;
            }
            if self
                .files
                .iter()
                .any(|f| f.name == name && f.action == FileAction::Keep)
            {
                errors.push(BatchError::DuplicateName { name });
                continue;
            }
            let size = match std::fs::metadata(path) {
                Ok(meta) => meta.len(),
                Err(source) => {
                    errors.push(BatchError::Read { name, source });
                    continue;
                }
            };
            if size > self.options.max_size_mb * 1024 * 1024 {
                errors.push(BatchError::TooLarge {
                    name,
                    max_mb: self.options.max_size_mb,
                });
                continue;
            }
            accepted.push((name, path.clone()));
        }

        // One blocking read per accepted file, all in flight at once. The
        // batch list is only replaced after the last read has finished.
        let handles: Vec<_> = accepted
            .into_iter()
            .map(|(name, path)| {
                let handle = tokio::task::spawn_blocking(move || std::fs::read(path));
                (name, handle)
            })
            .collect();

        let mut next = self.files.clone();
        for (name, handle) in handles {
            let read = match handle.await {
                Ok(read) => read,
                Err(join) => {
                    errors.push(BatchError::Read {
                        name,
                        source: std::io::Error::other(join),
                    });
                    continue;
                }
            };
            match read {
                Ok(bytes) => merge(&mut next, FileDescriptor::new(name, bytes), &self.options),
                Err(source) => errors.push(BatchError::Read { name, source }),
            }
        }

        debug!(
            files = next.len(),
            rejected = errors.len(),
            "batch selection merged"
        );
        self.files = next;
        errors
    }

    /// Adds one in-memory file, applying the same merge rules as
    /// [`add_paths`](Self::add_paths) but none of the filter chain.
    pub fn push(&mut self, file: FileDescriptor) {
        let mut next = std::mem::take(&mut self.files);
        merge(&mut next, file, &self.options);
        self.files = next;
    }

    /// Removes one file: new descriptors drop out of the batch, anything
    /// stored is soft-deleted by marking it for removal.
    pub fn remove(&mut self, name: &str) {
        let Some(pos) = self.files.iter().position(|f| f.name == name) else {
            return;
        };
        if self.files[pos].action == FileAction::New {
            self.files.remove(pos);
        } else {
            self.files[pos].action = FileAction::Remove;
        }
    }

    /// Reverts a soft-deleted file to the state it came from.
    pub fn revert(&mut self, name: &str) {
        if let Some(file) = self.files.iter_mut().find(|f| f.name == name) {
            file.action = if file.is_clone {
                FileAction::Keep
            } else {
                FileAction::New
            };
        }
    }

    /// Drops everything that is not stored server-side and normalizes
    /// soft-deleted clones back to their stored state.
    pub fn reset(&mut self) {
        self.files.retain(|f| f.is_clone);
        for file in &mut self.files {
            if file.action == FileAction::Remove {
                file.action = FileAction::Keep;
            }
        }
    }
}

/// Merges one loaded file into the list: same-named non-stored entries are
/// replaced; single-file mode replaces the whole list.
fn merge(files: &mut Vec<FileDescriptor>, file: FileDescriptor, options: &BatchOptions) {
    files.retain(|f| f.name != file.name);
    if options.max_files == 1 {
        files.clear();
    }
    files.push(file);
}

/// `None` means the allow-list accepts everything.
fn parse_accept(accept: &str) -> Option<Vec<String>> {
    if accept.trim() == "*" {
        return None;
    }
    Some(
        accept
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect(),
    )
}

/// Compares the lowercased extension (text after the last dot; the whole
/// name when there is no dot) against the configured list.
fn has_accepted_extension(name: &str, exts: &[String]) -> bool {
    let lower = name.to_lowercase();
    let ext = lower.rsplit('.').next().unwrap_or(&lower);
    exts.iter().any(|e| e == ext)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    fn multi(accept: &str, max_files: usize, max_size_mb: u64) -> BatchOptions {
        BatchOptions {
            accept: accept.into(),
            multi_select: true,
            max_files,
            max_size_mb,
        }
    }

    #[tokio::test]
    async fn accepts_and_loads_files() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.txt", b"AAA");
        let b = write_file(dir.path(), "b.txt", b"BBBB");

        let mut batch = UploadBatch::new(multi("*", 20, 1000));
        let errors = batch.add_paths(&[a, b]).await;
        assert!(errors.is_empty());
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.files()[0].name, "a.txt");
        assert_eq!(batch.files()[0].payload.as_ref(), b"AAA");
        assert_eq!(batch.files()[1].size(), 4);
    }

    #[tokio::test]
    async fn count_cap_rejects_whole_selection() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.txt", b"A");
        let b = write_file(dir.path(), "b.txt", b"B");
        let c = write_file(dir.path(), "c.txt", b"C");

        let mut batch = UploadBatch::new(multi("*", 2, 1000));
        let errors = batch.add_paths(&[a, b, c]).await;
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], BatchError::TooManyFiles { max: 2 }));
        // Nothing is added, not even the files that would have fit.
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn extension_and_size_rejections_are_independent() {
        let dir = TempDir::new().unwrap();
        let bad_ext = write_file(dir.path(), "malware.exe", b"X");
        let too_big = write_file(dir.path(), "big.png", &vec![0u8; 2 * 1024 * 1024]);
        let good = write_file(dir.path(), "ok.png", b"PNG");

        let mut batch = UploadBatch::new(multi(".png, .jpg", 20, 1));
        let errors = batch.add_paths(&[bad_ext, too_big, good]).await;

        assert_eq!(errors.len(), 2);
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, BatchError::UnsupportedExtension { name, .. } if name == "malware.exe"))
        );
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, BatchError::TooLarge { name, .. } if name == "big.png"))
        );
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.files()[0].name, "ok.png");
    }

    #[tokio::test]
    async fn duplicate_name_against_stored_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "report.pdf", b"NEW");

        let mut batch = UploadBatch::with_files(
            multi("*", 20, 1000),
            vec![FileDescriptor::stored("report.pdf", "docs")],
        );
        let errors = batch.add_paths(&[path]).await;
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            BatchError::DuplicateName { name } if name == "report.pdf"
        ));
        assert_eq!(batch.len(), 1);
    }

    #[tokio::test]
    async fn replaces_same_named_new_file() {
        let dir = TempDir::new().unwrap();
        let first = write_file(dir.path(), "a.txt", b"OLD");
        let mut batch = UploadBatch::new(multi("*", 20, 1000));
        batch.add_paths(&[first]).await;

        let second = write_file(dir.path(), "a.txt", b"NEWER");
        let errors = batch.add_paths(&[second]).await;
        assert!(errors.is_empty());
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.files()[0].payload.as_ref(), b"NEWER");
    }

    #[tokio::test]
    async fn single_file_mode_replaces_list() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.txt", b"A");
        let b = write_file(dir.path(), "b.txt", b"B");

        let mut batch = UploadBatch::new(BatchOptions {
            max_files: 1,
            ..BatchOptions::default()
        });
        batch.add_paths(&[a]).await;
        batch.add_paths(&[b]).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.files()[0].name, "b.txt");
    }

    #[tokio::test]
    async fn missing_file_reports_read_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.txt");
        let good = write_file(dir.path(), "ok.txt", b"OK");

        let mut batch = UploadBatch::new(multi("*", 20, 1000));
        let errors = batch.add_paths(&[missing, good]).await;
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], BatchError::Read { name, .. } if name == "nope.txt"));
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn remove_new_file_is_hard() {
        let mut batch = UploadBatch::new(BatchOptions::default());
        batch.push(FileDescriptor::new("a.txt", &b"A"[..]));
        batch.remove("a.txt");
        assert!(batch.is_empty());
    }

    #[test]
    fn remove_stored_file_is_soft() {
        let mut batch = UploadBatch::with_files(
            BatchOptions::default(),
            vec![FileDescriptor::stored("a.txt", "docs")],
        );
        batch.remove("a.txt");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.files()[0].action, FileAction::Remove);
    }

    #[test]
    fn revert_restores_origin_state() {
        let mut batch = UploadBatch::with_files(
            BatchOptions::default(),
            vec![FileDescriptor::stored("kept.txt", "docs")],
        );
        batch.push(FileDescriptor::new("fresh.txt", &b"F"[..]));

        batch.remove("kept.txt");
        batch.revert("kept.txt");
        assert_eq!(batch.files()[0].action, FileAction::Keep);

        // A new file marked by hand also reverts to new.
        batch.files_mut()[1].action = FileAction::Remove;
        batch.revert("fresh.txt");
        assert_eq!(batch.files()[1].action, FileAction::New);
    }

    #[test]
    fn reset_keeps_only_clones() {
        let mut batch = UploadBatch::with_files(
            BatchOptions::default(),
            vec![
                FileDescriptor::stored("kept.txt", "docs"),
                FileDescriptor::stored("deleted.txt", "docs"),
            ],
        );
        batch.push(FileDescriptor::new("fresh.txt", &b"F"[..]));
        batch.remove("deleted.txt");

        batch.reset();
        assert_eq!(batch.len(), 2);
        assert!(batch.files().iter().all(|f| f.action == FileAction::Keep));
        assert!(batch.files().iter().all(|f| f.is_clone));
    }

    #[test]
    fn extension_check_uses_lowercased_suffix() {
        let exts = vec!["png".to_string(), "jpg".to_string()];
        assert!(has_accepted_extension("photo.PNG", &exts));
        assert!(has_accepted_extension("archive.tar.jpg", &exts));
        assert!(!has_accepted_extension("notes.txt", &exts));
        assert!(!has_accepted_extension("noextension", &exts));
    }

    #[test]
    fn accept_star_means_everything() {
        assert!(parse_accept("*").is_none());
        let exts = parse_accept(".jpg, .png").unwrap();
        assert_eq!(exts, vec!["jpg".to_string(), "png".to_string()]);
    }
}
