//! Upload controller: one trigger, one in-flight upload, one status line.
//!
//! `trigger` disables the gate, POSTs the selected workbook, saves the returned
//! document and reports every transition on the status board. The gate is
//! re-enabled by a guard on every exit path.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::ClientConfig;
use crate::download::{DirectorySink, DownloadSink};
use crate::filename::derive_output_filename;
use crate::selection::FileSelection;
use crate::status::{Status, StatusBoard};
use crate::transport::{CurlTransport, Transport, TransportError, UploadRequest};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Triggered with an empty selection. Nothing was sent.
    #[error("please select a file")]
    NoFileSelected,
    /// The gate was closed: another upload is still in flight.
    #[error("an upload is already in progress")]
    Busy,
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The document arrived but could not be written.
    #[error("could not save document: {0}")]
    Save(String),
}

/// A finished upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub path: PathBuf,
    pub filename: String,
    pub bytes: usize,
}

/// Re-enables the trigger when dropped.
struct TriggerGuard<'a> {
    enabled: &'a AtomicBool,
}

impl<'a> TriggerGuard<'a> {
    /// Closes the gate; `None` if it was already closed.
    fn claim(enabled: &'a AtomicBool) -> Option<Self> {
        enabled
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TriggerGuard { enabled })
    }
}

impl Drop for TriggerGuard<'_> {
    fn drop(&mut self) {
        self.enabled.store(true, Ordering::Release);
    }
}

pub struct UploadController {
    endpoint: String,
    field_name: String,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn DownloadSink>,
    status: StatusBoard,
    enabled: AtomicBool,
}

impl UploadController {
    pub fn new(
        cfg: &ClientConfig,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            field_name: cfg.field_name.clone(),
            transport,
            sink,
            status: StatusBoard::new(),
            enabled: AtomicBool::new(true),
        }
    }

    /// libcurl transport and a directory sink, both configured from `cfg`.
    pub fn from_config(cfg: &ClientConfig, download_dir: PathBuf) -> Self {
        Self::new(
            cfg,
            Arc::new(CurlTransport::from_config(cfg)),
            Arc::new(DirectorySink::new(download_dir, cfg.overwrite)),
        )
    }

    pub fn status(&self) -> Status {
        self.status.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    /// False while an upload is in flight.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Uploads the selected file and saves the converted document.
    ///
    /// Returns `Busy` without touching any state when an upload is already running,
    /// and `NoFileSelected` (gate untouched) when the selection is empty.
    pub async fn trigger(&self, selection: &FileSelection) -> Result<UploadOutcome, UploadError> {
        if !self.is_enabled() {
            return Err(UploadError::Busy);
        }
        let Some(file) = selection.selected() else {
            tracing::info!("trigger without a selected file");
            self.status.set(Status::SelectFile);
            return Err(UploadError::NoFileSelected);
        };
        let _gate = TriggerGuard::claim(&self.enabled).ok_or(UploadError::Busy)?;
        self.status.set(Status::Generating);

        let result = self.upload(file.clone()).await;
        match &result {
            Ok(outcome) => {
                tracing::info!(path = %outcome.path.display(), bytes = outcome.bytes, "upload complete");
                self.status.set(Status::Completed(outcome.path.clone()));
            }
            Err(e) => {
                tracing::warn!("upload of {} failed: {}", file.name(), e);
                self.status.set(Status::Failed(e.to_string()));
            }
        }
        result
    }

    async fn upload(
        &self,
        file: crate::selection::SelectedFile,
    ) -> Result<UploadOutcome, UploadError> {
        if file.is_empty() {
            tracing::warn!("{} is empty", file.name());
        }
        if !file.is_xlsx() {
            tracing::warn!("{} is not an .xlsx workbook; the server may reject it", file.name());
        }
        let original = file.name().to_string();
        tracing::info!(
            endpoint = %self.endpoint,
            file = %original,
            bytes = file.len(),
            "uploading"
        );

        let request = UploadRequest::new(&self.field_name, file);
        let response = tokio::task::spawn_blocking({
            let transport = Arc::clone(&self.transport);
            let endpoint = self.endpoint.clone();
            move || transport.post(&endpoint, request)
        })
        .await
        .map_err(|e| TransportError::Network(format!("transport task failed: {}", e)))??;

        tracing::debug!(
            status = response.status,
            content_disposition = ?response.content_disposition,
            bytes = response.body.len(),
            "response"
        );
        if !response.is_success() {
            return Err(TransportError::Http(response.status).into());
        }

        let filename = derive_output_filename(response.content_disposition.as_deref(), &original);
        let bytes = response.body.len();
        let path = tokio::task::spawn_blocking({
            let sink = Arc::clone(&self.sink);
            let filename = filename.clone();
            move || sink.save(&filename, &response.body)
        })
        .await
        .map_err(|e| UploadError::Save(format!("save task failed: {}", e)))?
        .map_err(|e| UploadError::Save(format!("{:#}", e)))?;

        Ok(UploadOutcome {
            path,
            filename,
            bytes,
        })
    }
}
