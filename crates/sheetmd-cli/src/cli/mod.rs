//! CLI for the sheetmd spreadsheet-to-Markdown client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use sheetmd_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_config, run_man, run_upload, UploadArgs};

/// Top-level CLI for sheetmd.
#[derive(Debug, Parser)]
#[command(name = "sheetmd")]
#[command(about = "sheetmd: upload an Excel workbook and save the generated Markdown", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload a workbook to the conversion endpoint and save the returned document.
    Upload {
        /// Workbook to upload (.xlsx).
        path: Option<PathBuf>,

        /// Endpoint URL (overrides `endpoint` in config.toml).
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Directory to save the document into (default: config, then current directory).
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Replace an existing file with the same name.
        #[arg(long)]
        overwrite: bool,

        /// Give up on the request after N seconds (default: wait indefinitely).
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Print the config file path and the effective configuration.
    Config,

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Upload {
                path,
                endpoint,
                output_dir,
                overwrite,
                timeout,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let args = UploadArgs {
                    path,
                    endpoint,
                    output_dir,
                    overwrite,
                    timeout,
                };
                run_upload(cfg, args).await?;
            }
            CliCommand::Config => run_config()?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
