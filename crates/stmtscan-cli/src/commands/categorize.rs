//! Categorize command - assign spending categories to a transactions payload.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use stmtscan_core::tools::categorize_transactions_json;

use super::{emit, load_config};

/// Arguments for the categorize command.
#[derive(Args)]
pub struct CategorizeArgs {
    /// Transactions JSON file, or "-" for stdin (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the delay between model calls, in milliseconds
    #[arg(long)]
    pacing_ms: Option<u64>,
}

pub async fn run(args: CategorizeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(pacing_ms) = args.pacing_ms {
        config.categorizer.pacing_ms = pacing_ms;
    }

    let payload = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let json = categorize_transactions_json(&config, &payload).await;
    emit(&json, args.output.as_deref())
}
