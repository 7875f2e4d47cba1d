//! CLI command handlers, one per file.

mod completions;
mod config;
mod upload;

pub use completions::{run_completions, run_man};
pub use config::run_config;
pub use upload::{apply_overrides, run_upload, spawn_status_printer, UploadArgs};
