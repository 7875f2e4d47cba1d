//! HTTP transport for the upload request.
//!
//! `Transport` is the seam between the controller and the network. The
//! production implementation is `CurlTransport` (libcurl easy handle, blocking);
//! the controller runs it on the blocking pool so the async caller is only suspended.

mod client;
mod parse;

pub use client::CurlTransport;
pub use parse::{header_value, parse_status_line};

use crate::selection::SelectedFile;

/// One multipart POST: a single part named `field_name` wrapping the selected file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub field_name: String,
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadRequest {
    pub fn new(field_name: &str, file: SelectedFile) -> Self {
        let (filename, mime, bytes) = file.into_parts();
        Self {
            field_name: field_name.to_string(),
            filename,
            mime,
            bytes,
        }
    }
}

/// What came back from the server. `body` is left empty for non-2xx responses.
#[derive(Debug, Clone, Default)]
pub struct UploadResponse {
    pub status: u32,
    /// Raw `Content-Disposition` value, if the server sent one.
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        is_success(self.status)
    }
}

pub(crate) fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}

/// Transport-level failure. The two kinds differ only in what the user is told.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced an HTTP response (refused, DNS, timeout, ...).
    #[error("upload failed: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("upload failed: HTTP {0}")]
    Http(u32),
}

/// Sends an upload request and waits for the whole response.
///
/// Implementations block; callers in async code go through `spawn_blocking`.
/// A non-2xx answer is still `Ok`: turning it into `TransportError::Http` is the caller's call.
pub trait Transport: Send + Sync {
    fn post(&self, endpoint: &str, request: UploadRequest) -> Result<UploadResponse, TransportError>;
}
