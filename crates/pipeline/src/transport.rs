//! Abstract transport the pipeline sends its units through.

use std::future::Future;
use std::pin::Pin;

use filedrop_protocol::{ApiResult, RemoteFile, TransferUnit};

/// Errors raised by a [`FileTransport`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http error: {0}")]
    Http(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Capability to send one multipart unit to the backend.
///
/// The surrounding application implements this on top of its HTTP stack.
/// Using a trait keeps the pipeline decoupled from transport and testable
/// with scripted mocks.
pub trait FileTransport: Send + Sync {
    /// Sends one unit and returns the backend's structured reply.
    fn send(
        &self,
        unit: TransferUnit,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResult<RemoteFile>, TransportError>> + Send + '_>>;
}
