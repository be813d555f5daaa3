use bytes::Bytes;

/// What a [`TransferUnit`] asks the backend to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Upload,
    Delete,
}

/// One multipart request unit: a whole small file, a single chunk of a
/// large file, or a deletion marker.
///
/// The multipart file part is always named by [`FILE_PART_KEY`] and carries
/// the owning file's name, whatever the unit kind — chunk bodies are not
/// renamed on the wire.
///
/// [`FILE_PART_KEY`]: crate::FILE_PART_KEY
#[derive(Debug, Clone)]
pub struct TransferUnit {
    pub kind: TransferKind,
    /// Endpoint URL this unit is posted to.
    pub endpoint: String,
    pub folder_path: String,
    /// Correlation key shared by every unit of one run.
    pub key_random: String,
    pub file_name: String,
    /// 1-based position in the run's shared counter. Upload units only.
    pub index_file: Option<u32>,
    /// Total uploadable files in the run. Upload units only.
    pub index_file_total: Option<u32>,
    /// Tells the backend to stage the file pending an outer commit.
    pub is_pending_submit: bool,
    /// `(chunk, chunks)`, 1-based. Chunked units only.
    pub chunk: Option<(u32, u32)>,
    /// Bytes of the file part.
    pub body: Bytes,
}

impl TransferUnit {
    /// A deletion marker.
    ///
    /// The file part carries the correlation key itself as a placeholder
    /// body — the backend only reads the text fields.
    pub fn delete(
        endpoint: &str,
        folder_path: &str,
        key_random: &str,
        file_name: &str,
        is_pending_submit: bool,
    ) -> Self {
        Self {
            kind: TransferKind::Delete,
            endpoint: endpoint.to_string(),
            folder_path: folder_path.to_string(),
            key_random: key_random.to_string(),
            file_name: file_name.to_string(),
            index_file: None,
            index_file_total: None,
            is_pending_submit,
            chunk: None,
            body: Bytes::from(key_random.as_bytes().to_vec()),
        }
    }

    /// A whole small file.
    #[allow(clippy::too_many_arguments)]
    pub fn file(
        endpoint: &str,
        folder_path: &str,
        key_random: &str,
        file_name: &str,
        index_file: u32,
        index_file_total: u32,
        is_pending_submit: bool,
        body: Bytes,
    ) -> Self {
        Self {
            kind: TransferKind::Upload,
            endpoint: endpoint.to_string(),
            folder_path: folder_path.to_string(),
            key_random: key_random.to_string(),
            file_name: file_name.to_string(),
            index_file: Some(index_file),
            index_file_total: Some(index_file_total),
            is_pending_submit,
            chunk: None,
            body,
        }
    }

    /// One chunk of a large file.
    #[allow(clippy::too_many_arguments)]
    pub fn chunk(
        endpoint: &str,
        folder_path: &str,
        key_random: &str,
        file_name: &str,
        chunk: u32,
        chunks: u32,
        index_file: u32,
        index_file_total: u32,
        is_pending_submit: bool,
        body: Bytes,
    ) -> Self {
        Self {
            chunk: Some((chunk, chunks)),
            ..Self::file(
                endpoint,
                folder_path,
                key_random,
                file_name,
                index_file,
                index_file_total,
                is_pending_submit,
                body,
            )
        }
    }

    /// Text fields of the multipart form, in wire order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("folderPath", self.folder_path.clone()),
            ("keyRandom", self.key_random.clone()),
            ("fileName", self.file_name.clone()),
        ];
        if let Some((chunk, chunks)) = self.chunk {
            fields.push(("chunk", chunk.to_string()));
            fields.push(("chunks", chunks.to_string()));
        }
        if let Some(index) = self.index_file {
            fields.push(("indexFile", index.to_string()));
        }
        if let Some(total) = self.index_file_total {
            fields.push(("indexFileTotal", total.to_string()));
        }
        fields.push(("isPendingSubmit", self.is_pending_submit.to_string()));
        fields
    }
}
