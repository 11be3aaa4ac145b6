//! Config command - manage the JSON configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use stmtscan_core::models::config::AppConfig;

use super::default_config_path;

const REDACTED: &str = "<redacted>";

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show configuration (file values, or with environment overrides applied)
    Show {
        /// Apply environment variable overrides
        #[arg(long)]
        effective: bool,
    },

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "categorizer.pacing_ms")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value (parsed as JSON, falling back to a plain string)
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { effective } => show_config(effective),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Get { key } => get_config(&key),
        ConfigCommand::Set { key, value } => set_config(&key, &value),
        ConfigCommand::Path => show_path(),
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<AppConfig> {
    if path.exists() {
        Ok(AppConfig::from_file(path)?)
    } else {
        Ok(AppConfig::default())
    }
}

/// Config as JSON with the access token masked.
fn redacted_json(config: &AppConfig) -> anyhow::Result<Value> {
    let mut json = serde_json::to_value(config)?;
    if let Some(token) = json.get_mut("access_token") {
        *token = Value::String(REDACTED.to_string());
    }
    Ok(json)
}

fn show_config(effective: bool) -> anyhow::Result<()> {
    let config_path = default_config_path();
    if !config_path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let mut config = load_or_default(&config_path)?;
    if effective {
        config.apply_env();
    }

    println!("{}", serde_json::to_string_pretty(&redacted_json(&config)?)?);
    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    AppConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );
    Ok(())
}

/// Look up a dotted key path in a JSON document.
fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(json, |current, part| current.get(part))
}

/// Set a dotted key path in a JSON document. The parent path must already exist.
fn assign(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parent_path, last) = match key.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, key),
    };

    let mut parent = json;
    if let Some(parent_path) = parent_path {
        for part in parent_path.split('.') {
            parent = parent
                .get_mut(part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
        }
    }

    match parent.as_object_mut() {
        Some(obj) => {
            obj.insert(last.to_string(), value);
            Ok(())
        }
        None => anyhow::bail!("Cannot set value at non-object path: {}", key),
    }
}

/// Set `key` to `raw` and validate the result against the typed config.
///
/// `raw` is read as JSON first. When that does not fit the field (a digit-only
/// id for a string setting, say), it is retried as a plain string.
fn apply_setting(config: &AppConfig, key: &str, raw: &str) -> anyhow::Result<(AppConfig, Value)> {
    let base = serde_json::to_value(config)?;
    let typed = |value: Value| -> anyhow::Result<AppConfig> {
        let mut json = base.clone();
        assign(&mut json, key, value)?;
        Ok(serde_json::from_value(json)?)
    };

    let parsed: Value =
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    match typed(parsed.clone()) {
        Ok(config) => Ok((config, parsed)),
        Err(err) if !(parsed.is_string() || parsed.is_null()) => {
            let text = Value::String(raw.to_string());
            typed(text.clone())
                .map(|config| (config, text))
                .map_err(|_| err)
        }
        Err(err) => Err(err),
    }
}

fn get_config(key: &str) -> anyhow::Result<()> {
    let config = load_or_default(&default_config_path())?;
    let json = redacted_json(&config)?;

    let value = lookup(&json, key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn set_config(key: &str, value: &str) -> anyhow::Result<()> {
    let config_path = default_config_path();
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = load_or_default(&config_path)?;
    let (config, parsed_value) = apply_setting(&config, key, value)?;
    config.save(&config_path)?;

    let shown = if key == "access_token" {
        REDACTED.to_string()
    } else {
        serde_json::to_string(&parsed_value)?
    };
    println!("{} Set {} = {}", style("✓").green(), key, shown);
    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'stmtscan config init' to create a configuration file.");
    }

    Ok(())
}
