//! The single user-visible status line.
//!
//! Every transition overwrites the previous value; observers subscribe to a
//! `watch` channel and see only the latest one.

use std::fmt;
use std::path::PathBuf;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    /// Triggered with nothing selected.
    SelectFile,
    /// Upload sent, waiting for the converted document.
    Generating,
    /// Upload or save failed; carries the reason.
    Failed(String),
    /// Document saved at the given path.
    Completed(PathBuf),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "ready"),
            Status::SelectFile => write!(f, "please select a file"),
            Status::Generating => write!(f, "generating…"),
            Status::Failed(reason) => write!(f, "error: {}", reason),
            Status::Completed(path) => write!(f, "done: saved {}", path.display()),
        }
    }
}

/// Owner of the current status. Cheap to read, overwritten on every `set`.
#[derive(Debug)]
pub struct StatusBoard {
    tx: watch::Sender<Status>,
}

impl StatusBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Status::Idle);
        Self { tx }
    }

    pub fn set(&self, status: Status) {
        tracing::debug!(status = %status, "status");
        self.tx.send_replace(status);
    }

    pub fn current(&self) -> Status {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.tx.subscribe()
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
