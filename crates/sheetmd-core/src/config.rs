use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Endpoint of the conversion function when running it locally.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:7071/api/upload";

/// Multipart field the server reads the workbook from.
pub const DEFAULT_FIELD_NAME: &str = "file";

/// Client configuration loaded from `~/.config/sheetmd/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// URL the workbook is POSTed to.
    pub endpoint: String,
    /// Name of the multipart field carrying the file.
    #[serde(default = "default_field_name")]
    pub field_name: String,
    /// Seconds allowed for establishing the connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Optional cap on the whole request in seconds (None = wait for the server indefinitely).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Directory converted documents are saved into (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Replace an existing file with the same name instead of failing.
    #[serde(default)]
    pub overwrite: bool,
}

fn default_field_name() -> String {
    DEFAULT_FIELD_NAME.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            field_name: default_field_name(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: None,
            download_dir: None,
            overwrite: false,
        }
    }
}

impl ClientConfig {
    /// Checks that the endpoint is an absolute http(s) URL and the field name is usable.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint)
            .with_context(|| format!("invalid endpoint URL: {}", self.endpoint))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("endpoint must be http or https, got {}", url.scheme());
        }
        if self.field_name.trim().is_empty() {
            anyhow::bail!("field_name must not be empty");
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Directory to save into, falling back to `cwd`.
    pub fn download_dir_or(&self, cwd: &Path) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| cwd.to_path_buf())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sheetmd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ClientConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        let default_cfg = ClientConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("write default config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ClientConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
