use serde::{Deserialize, Serialize};

/// Lifecycle state of a file within an upload batch.
///
/// Wire values match the backend: 0 new, 1 marked for deletion, 2 already
/// stored on the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FileAction {
    /// Freshly selected, not yet on the server.
    #[default]
    New,
    /// Marked for deletion on the next run.
    Remove,
    /// Already persisted server-side, carried through untouched.
    Keep,
}

impl From<FileAction> for u8 {
    fn from(action: FileAction) -> Self {
        match action {
            FileAction::New => 0,
            FileAction::Remove => 1,
            FileAction::Keep => 2,
        }
    }
}

/// Error returned when a wire value maps to no [`FileAction`].
#[derive(Debug, thiserror::Error)]
#[error("unknown file action: {0}")]
pub struct UnknownAction(pub u8);

impl TryFrom<u8> for FileAction {
    type Error = UnknownAction;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FileAction::New),
            1 => Ok(FileAction::Remove),
            2 => Ok(FileAction::Keep),
            other => Err(UnknownAction(other)),
        }
    }
}

/// A server-acknowledged file record — one manifest entry.
///
/// Upload replies carry the record the backend persisted; deletion and
/// pass-through entries are composed client-side with
/// `file_path = folder + "/" + name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub name: String,
    pub file_path: String,
    #[serde(default)]
    pub action: FileAction,
}

impl RemoteFile {
    /// Composes an entry for a file under `folder`.
    pub fn under(folder: &str, name: impl Into<String>, action: FileAction) -> Self {
        let name = name.into();
        Self {
            file_path: format!("{folder}/{name}"),
            name,
            action,
        }
    }
}
