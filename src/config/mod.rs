pub mod datasets;
pub mod settings;

#[cfg(feature = "cli")]
use crate::utils::error::{ExplorerError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "metadata-explorer")]
#[command(about = "Explore sequence metadata as per-month bar charts")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log process CPU and memory after each load phase")]
    pub monitor: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the web explorer
    Serve {
        /// Path to a TOML settings file
        #[arg(short, long)]
        config: Option<String>,

        /// Override the listen host
        #[arg(long)]
        host: Option<String>,

        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,

        /// Print the address to open in a browser once listening
        #[arg(long)]
        show: bool,
    },
    /// Load one metadata file and print its monthly counts
    Summarize {
        /// Local TSV file (optionally .gz, .xz or .zst)
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        file: Option<String>,

        /// Remote TSV file
        #[arg(long)]
        url: Option<String>,

        /// Split counts by this column
        #[arg(long)]
        color_by: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
        format: OutputFormat,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Tsv,
    Json,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Serve { config, host, .. } => {
                if let Some(path) = config {
                    validate_path("config", path)?;
                }
                if let Some(host) = host {
                    crate::utils::validation::validate_non_empty_string("host", host)?;
                }
                Ok(())
            }
            Command::Summarize { file, url, .. } => match (file, url) {
                (Some(file), None) => validate_path("file", file),
                (None, Some(url)) => validate_url("url", url),
                _ => Err(ExplorerError::MissingConfigError {
                    field: "file or url".to_string(),
                }),
            },
        }
    }
}
