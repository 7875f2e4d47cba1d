//! Saving the converted document.
//!
//! The body is written to `<name>.part` next to the destination, synced, and
//! renamed into place. The temp file is removed on every failure path, so a
//! save either produces the complete file or leaves nothing behind.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Temporary file suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (`out.md` → `out.md.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Where downloaded documents end up.
pub trait DownloadSink: Send + Sync {
    /// Stores `body` under `filename` and returns the final path.
    fn save(&self, filename: &str, body: &[u8]) -> Result<PathBuf>;
}

/// Saves into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            dir: dir.into(),
            overwrite,
        }
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, filename: &str, body: &[u8]) -> Result<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => anyhow::bail!("refusing to save to non-plain filename: {:?}", filename),
        }

        let final_path = self.dir.join(filename);
        if !self.overwrite && final_path.exists() {
            anyhow::bail!(
                "{} already exists (enable overwrite to replace it)",
                final_path.display()
            );
        }

        let tmp = TempFile {
            path: temp_path(&final_path),
            keep: false,
        };
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp.path)
            .with_context(|| format!("failed to create temp file: {}", tmp.path.display()))?;
        file.write_all(body)
            .with_context(|| format!("write {}", tmp.path.display()))?;
        file.sync_all().context("sync downloaded file")?;
        drop(file);

        fs::rename(&tmp.path, &final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                tmp.path.display(),
                final_path.display()
            )
        })?;
        tmp.disarm();

        tracing::info!(path = %final_path.display(), bytes = body.len(), "saved document");
        Ok(final_path)
    }
}

/// Removes the temp file when dropped unless disarmed after a successful rename.
struct TempFile {
    path: PathBuf,
    keep: bool,
}

impl TempFile {
    fn disarm(mut self) {
        self.keep = true;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.keep {
            if let Err(e) = fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), "could not remove temp file: {}", e);
                }
            }
        }
    }
}
