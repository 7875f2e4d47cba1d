//! libcurl-backed transport.

use std::cell::Cell;
use std::str;
use std::time::Duration;

use super::{is_success, parse, Transport, TransportError, UploadRequest, UploadResponse};
use crate::config::ClientConfig;

/// Blocking multipart POST over a fresh libcurl easy handle per request.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Option<Duration>,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration, timeout: Option<Duration>) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self::new(cfg.connect_timeout(), cfg.timeout())
    }

    fn perform(&self, endpoint: &str, request: UploadRequest) -> Result<UploadResponse, curl_fail::Fail> {
        let UploadRequest {
            field_name,
            filename,
            mime,
            bytes,
        } = request;

        let mut easy = curl::easy::Easy::new();
        easy.url(endpoint)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(t) = self.timeout {
            easy.timeout(t)?;
        }

        let mut form = curl::easy::Form::new();
        form.part(&field_name)
            .buffer(&filename, bytes)
            .content_type(&mime)
            .add()?;
        easy.httppost(form)?;

        // Status of the response currently being received; reset on every
        // status line so interim 100s and redirects don't leak headers.
        let status = Cell::new(None::<u32>);
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    if let Some(code) = parse::parse_status_line(line) {
                        status.set(Some(code));
                        headers.clear();
                    } else if !line.is_empty() {
                        headers.push(line.to_string());
                    }
                }
                true
            })?;
            transfer.write_function(|data| {
                // Error bodies are drained but not kept.
                if status.get().map_or(true, is_success) {
                    body.extend_from_slice(data);
                }
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        tracing::debug!(endpoint, code, bytes = body.len(), "upload response");
        if !is_success(code) {
            body.clear();
        }

        Ok(UploadResponse {
            status: code,
            content_disposition: parse::header_value(&headers, "content-disposition"),
            body,
        })
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl Transport for CurlTransport {
    fn post(&self, endpoint: &str, request: UploadRequest) -> Result<UploadResponse, TransportError> {
        tracing::debug!(
            endpoint,
            field = %request.field_name,
            filename = %request.filename,
            bytes = request.bytes.len(),
            "POST multipart"
        );
        self.perform(endpoint, request)
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}

/// Folds the two libcurl error types into one so `?` works throughout `perform`.
mod curl_fail {
    use std::fmt;

    #[derive(Debug)]
    pub(super) enum Fail {
        Curl(curl::Error),
        Form(curl::FormError),
    }

    impl fmt::Display for Fail {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Fail::Curl(e) => {
                    write!(f, "{}", e.description())?;
                    if let Some(extra) = e.extra_description() {
                        write!(f, " ({})", extra)?;
                    }
                    Ok(())
                }
                Fail::Form(e) => write!(f, "multipart form: {}", e),
            }
        }
    }

    impl From<curl::Error> for Fail {
        fn from(e: curl::Error) -> Self {
            Fail::Curl(e)
        }
    }

    impl From<curl::FormError> for Fail {
        fn from(e: curl::FormError) -> Self {
            Fail::Form(e)
        }
    }
}
