//! `sheetmd config` – show where the config lives and what it resolves to.

use anyhow::Result;
use sheetmd_core::{config, logging};

pub fn run_config() -> Result<()> {
    let path = config::config_path()?;
    let cfg = config::load_or_init_at(&path)?;
    println!("# config: {}", path.display());
    if let Ok(log) = logging::log_file_path() {
        println!("# log:    {}", log.display());
    }
    print!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}
