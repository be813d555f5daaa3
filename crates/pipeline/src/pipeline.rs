//! Pipeline orchestration.
//!
//! Drives one batch through the delete, small-file, chunked large-file and
//! pass-through phases against a [`FileTransport`], sequentially, aborting
//! the whole run on the first failed unit.

use bytes::Bytes;
use filedrop_batch::UploadBatch;
use filedrop_protocol::{
    CHUNK_SIZE, FileAction, KEY_RANDOM_CHARSET, KEY_RANDOM_LEN, RemoteFile, TransferUnit,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{AbortReason, UploadError, UploadPhase};
use crate::events::{Destination, UploadEvent, UploadOutcome};
use crate::planner;
use crate::transport::FileTransport;

/// Drives upload batches to completion or well-defined failure.
pub struct UploadPipeline {
    events_tx: mpsc::Sender<UploadEvent>,
    events_rx: Option<mpsc::Receiver<UploadEvent>>,
}

impl Default for UploadPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadPipeline {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Runs one batch against `dest`.
    ///
    /// Every transport call is sequential and awaited; all units share one
    /// random correlation key. On success the outcome lists the acknowledged
    /// entries in phase order; any failed unit in the delete, small-file or
    /// chunk phases aborts the run with no partial result. Per-file
    /// `progress_percent` is updated in place on the batch as a side channel
    /// (mutations made before an abort stay visible).
    pub async fn run(
        &self,
        transport: &dyn FileTransport,
        batch: &mut UploadBatch,
        dest: &Destination,
    ) -> Result<UploadOutcome, UploadError> {
        if dest.folder_path.trim().is_empty() {
            return Err(UploadError::EmptyFolderPath);
        }

        let key_random = correlation_key(KEY_RANDOM_LEN);
        let upload_total = batch.files().iter().filter(|f| f.is_uploadable()).count() as u32;
        // Deletions advance the running counter too, even though the total
        // only counts uploadable files.
        let mut index: u32 = 1;
        let mut synced: Vec<RemoteFile> = Vec::new();

        debug!(
            folder = %dest.folder_path,
            files = batch.len(),
            uploadable = upload_total,
            "upload run started"
        );

        // 1. Deletions.
        let removals: Vec<String> = batch
            .files()
            .iter()
            .filter(|f| f.action == FileAction::Remove)
            .map(|f| f.name.clone())
            .collect();
        for name in removals {
            let unit = TransferUnit::delete(
                &dest.delete_url,
                &dest.folder_path,
                &key_random,
                &name,
                dest.defer_commit,
            );
            self.send_unit(transport, unit, UploadPhase::Delete, &synced)
                .await?;
            synced.push(RemoteFile::under(
                &dest.folder_path,
                name.clone(),
                FileAction::Remove,
            ));
            self.set_progress(batch, &name, 100).await;
            index += 1;
        }

        // 2. Small files, one unit each.
        let smalls: Vec<(String, Bytes)> = batch
            .files()
            .iter()
            .filter(|f| f.is_uploadable() && f.size() <= CHUNK_SIZE)
            .map(|f| (f.name.clone(), f.payload.clone()))
            .collect();
        for (name, payload) in smalls {
            let unit = TransferUnit::file(
                &dest.upload_url,
                &dest.folder_path,
                &key_random,
                &name,
                index,
                upload_total,
                dest.defer_commit,
                payload,
            );
            let record = self
                .send_unit(transport, unit, UploadPhase::File, &synced)
                .await?;
            synced.push(record);
            self.set_progress(batch, &name, 100).await;
            index += 1;
        }

        // 3. Large files, chunked, chunks strictly in order.
        let bigs: Vec<(String, Bytes)> = batch
            .files()
            .iter()
            .filter(|f| f.is_uploadable() && f.size() > CHUNK_SIZE)
            .map(|f| (f.name.clone(), f.payload.clone()))
            .collect();
        for (name, payload) in bigs {
            let spans = planner::plan(payload.len() as u64, CHUNK_SIZE as u64);
            let chunks = spans.len() as u32;
            for (i, span) in spans.iter().enumerate() {
                let body = payload.slice(span.start as usize..span.end as usize);
                let unit = TransferUnit::chunk(
                    &dest.upload_url,
                    &dest.folder_path,
                    &key_random,
                    &name,
                    i as u32 + 1,
                    chunks,
                    index,
                    upload_total,
                    dest.defer_commit,
                    body,
                );
                let record = self
                    .send_unit(transport, unit, UploadPhase::Chunk, &synced)
                    .await?;
                self.set_progress(batch, &name, ((i as u32 + 1) * 100 / chunks) as u8)
                    .await;
                // Only the terminal chunk's reply stands for the whole
                // reassembled file.
                if i as u32 + 1 == chunks {
                    synced.push(record);
                }
            }
            index += 1;
        }

        // 4. Pass-through for files already on the server — no traffic.
        for file in batch.files() {
            if file.action == FileAction::Keep {
                let base = file.file_path.as_deref().unwrap_or_default();
                synced.push(RemoteFile::under(base, file.name.clone(), FileAction::Keep));
            }
        }

        info!(entries = synced.len(), folder = %dest.folder_path, "upload run complete");
        let _ = self
            .events_tx
            .send(UploadEvent::Completed {
                files: synced.len(),
            })
            .await;

        Ok(UploadOutcome {
            entries: synced,
            folder_path: dest.folder_path.clone(),
        })
    }

    /// Sends one unit and insists on a successful reply carrying a record.
    async fn send_unit(
        &self,
        transport: &dyn FileTransport,
        unit: TransferUnit,
        phase: UploadPhase,
        synced: &[RemoteFile],
    ) -> Result<RemoteFile, UploadError> {
        let file = unit.file_name.clone();
        let reply = match transport.send(unit).await {
            Ok(reply) => reply,
            Err(err) => {
                return Err(self
                    .abort(phase, file, AbortReason::Transport(err), synced)
                    .await);
            }
        };
        if !reply.status {
            let reason = AbortReason::Backend(reply.msg.to_text());
            return Err(self.abort(phase, file, reason, synced).await);
        }
        match reply.data {
            Some(record) => Ok(record),
            None => Err(self.abort(phase, file, AbortReason::EmptyReply, synced).await),
        }
    }

    async fn abort(
        &self,
        phase: UploadPhase,
        file: String,
        reason: AbortReason,
        synced: &[RemoteFile],
    ) -> UploadError {
        warn!(%phase, file = %file, error = %reason, "upload run aborted");
        let _ = self
            .events_tx
            .send(UploadEvent::Failed {
                error: reason.to_string(),
            })
            .await;
        UploadError::Aborted {
            phase,
            file,
            reason,
            synced: synced.to_vec(),
        }
    }

    async fn set_progress(&self, batch: &mut UploadBatch, name: &str, percent: u8) {
        for file in batch.files_mut() {
            if file.name == name {
                file.progress_percent = percent;
            }
        }
        let _ = self
            .events_tx
            .send(UploadEvent::Progress {
                name: name.to_string(),
                percent,
            })
            .await;
    }
}

/// Random key shared by every unit of one run, letting the backend group
/// them under one logical submission.
fn correlation_key(len: usize) -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    (0..len)
        .map(|_| KEY_RANDOM_CHARSET[rng.random_range(0..KEY_RANDOM_CHARSET.len())] as char)
        .collect()
}
