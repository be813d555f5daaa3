//! Wire types for the filedrop upload backend.
//!
//! Everything a transport needs to talk to the REST endpoints lives here:
//! the JSON result envelope, the file lifecycle tags, the acknowledged file
//! record, and the multipart [`TransferUnit`] with its exact field set.

pub mod result;
pub mod types;
pub mod unit;

// Re-export primary types for convenience.
pub use result::{ApiMessage, ApiResult};
pub use types::{FileAction, RemoteFile, UnknownAction};
pub use unit::{TransferKind, TransferUnit};

/// Small/large split and chunk size: 2 MiB.
///
/// Files at or below this size are sent as a single multipart unit; larger
/// files are split into chunks of exactly this size (last chunk clipped).
pub const CHUNK_SIZE: usize = 2 * 1024 * 1024;

/// Length of the per-run correlation key.
pub const KEY_RANDOM_LEN: usize = 30;

/// Alphabet the correlation key is drawn from.
pub const KEY_RANDOM_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Multipart part key carrying file bytes.
pub const FILE_PART_KEY: &str = "file";
