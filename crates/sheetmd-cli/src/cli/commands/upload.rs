//! `sheetmd upload <path>` – upload a workbook and save the generated document.

use anyhow::Result;
use sheetmd_core::config::ClientConfig;
use sheetmd_core::controller::UploadController;
use sheetmd_core::selection::{FileSelection, SelectedFile};
use sheetmd_core::status::Status;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Command-line values that take precedence over config.toml.
#[derive(Debug, Default)]
pub struct UploadArgs {
    pub path: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub overwrite: bool,
    pub timeout: Option<u64>,
}

/// Folds CLI flags into the loaded config and re-validates it.
pub fn apply_overrides(mut cfg: ClientConfig, args: &UploadArgs) -> Result<ClientConfig> {
    if let Some(endpoint) = &args.endpoint {
        cfg.endpoint = endpoint.clone();
    }
    if let Some(dir) = &args.output_dir {
        cfg.download_dir = Some(dir.clone());
    }
    if args.overwrite {
        cfg.overwrite = true;
    }
    if args.timeout.is_some() {
        cfg.timeout_secs = args.timeout;
    }
    cfg.validate()?;
    Ok(cfg)
}

pub async fn run_upload(cfg: ClientConfig, args: UploadArgs) -> Result<()> {
    let cfg = apply_overrides(cfg, &args)?;
    let download_dir = cfg.download_dir_or(&std::env::current_dir()?);

    let selection: FileSelection = args
        .path
        .as_deref()
        .map(SelectedFile::from_path)
        .transpose()?
        .into();

    let controller = UploadController::from_config(&cfg, download_dir);
    let printer = spawn_status_printer(controller.subscribe(), io::stdout());

    let result = controller.trigger(&selection).await;
    // Dropping the controller closes the status channel and ends the printer.
    drop(controller);
    printer.await?;

    let outcome = result?;
    tracing::info!(path = %outcome.path.display(), "upload command finished");
    Ok(())
}

/// Writes each status the receiver observes as one line until the sender is dropped.
/// Returns the writer so callers can inspect what was printed.
pub fn spawn_status_printer<W>(mut status_rx: watch::Receiver<Status>, mut out: W) -> JoinHandle<W>
where
    W: Write + Send + 'static,
{
    tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let line = status_rx.borrow_and_update().to_string();
            if let Err(e) = writeln!(out, "{}", line) {
                tracing::warn!("could not print status: {}", e);
            }
        }
        out
    })
}
