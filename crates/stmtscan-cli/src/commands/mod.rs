//! Subcommand implementations.

pub mod analyze;
pub mod batch;
pub mod categorize;
pub mod check_env;
pub mod config;
pub mod parse;

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use tracing::debug;

use stmtscan_core::models::config::AppConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stmtscan")
        .join("config.json")
}

/// Load configuration from `path` (or the default file when present), then overlay the environment.
pub fn load_config(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::from_file(Path::new(path))?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                debug!("Loading config from {}", default_path.display());
                AppConfig::from_file(&default_path)?
            } else {
                AppConfig::default()
            }
        }
    };
    config.apply_env();
    Ok(config)
}

/// Fail with a readable message when `input` is not an existing file.
pub fn require_file(input: &Path) -> anyhow::Result<()> {
    if !input.is_file() {
        anyhow::bail!("PDF file not found at {}", input.display());
    }
    Ok(())
}

/// Write `content` to `output`, or to stdout when no path is given.
pub fn emit(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(output_path) => {
            fs::write(output_path, content)?;
            eprintln!(
                "{} Output written to {}",
                style("✓").green(),
                output_path.display()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
