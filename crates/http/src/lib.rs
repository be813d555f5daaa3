//! reqwest-backed [`FileTransport`] plus thin REST helpers around stored
//! files (listing a folder, downloading one file).

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use filedrop_pipeline::{FileTransport, TransportError};
use filedrop_protocol::{ApiResult, FILE_PART_KEY, RemoteFile, TransferUnit};
use tracing::debug;

/// Sends transfer units to the backend as multipart POSTs.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client (timeouts, proxies, default headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn post_unit(&self, unit: TransferUnit) -> Result<ApiResult<RemoteFile>, TransportError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in unit.fields() {
            form = form.text(name, value);
        }
        let part = reqwest::multipart::Part::bytes(unit.body.to_vec())
            .file_name(unit.file_name.clone());
        form = form.part(FILE_PART_KEY, part);

        debug!(
            endpoint = %unit.endpoint,
            file = %unit.file_name,
            bytes = unit.body.len(),
            chunk = ?unit.chunk,
            "posting transfer unit"
        );

        let response = self
            .client
            .post(&unit.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Lists the files currently stored under `folder_path`.
    pub async fn fetch_files(
        &self,
        url: &str,
        folder_path: &str,
    ) -> Result<ApiResult<Vec<RemoteFile>>, TransportError> {
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "folderPath": folder_path }))
            .send()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Downloads one stored file's bytes.
    pub async fn download(&self, url: &str, file: &RemoteFile) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .post(url)
            .json(file)
            .send()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        response
            .bytes()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))
    }
}

impl FileTransport for HttpTransport {
    fn send(
        &self,
        unit: TransferUnit,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResult<RemoteFile>, TransportError>> + Send + '_>>
    {
        Box::pin(self.post_unit(unit))
    }
}
