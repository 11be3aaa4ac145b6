//! Parse command - extract transactions from a single statement.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tracing::{debug, info};

use stmtscan_core::tools::parse_statement_json;

use super::{emit, load_config, require_file};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Statement PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    require_file(&args.input)?;
    let input = args.input.canonicalize()?;
    info!("Processing file: {}", input.display());

    let json = parse_statement_json(&config, &input.to_string_lossy()).await;
    emit(&json, args.output.as_deref())?;

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}
