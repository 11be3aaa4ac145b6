//! Analyze command - extract and categorize transactions in one run.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::debug;

use stmtscan_core::categorize::{
    Categorizer, FixedIntervalGate, RateLimiter, TextClassifier, VertexGeminiClient,
};
use stmtscan_core::ocr::DocumentAiClient;
use stmtscan_core::statement::{HeaderClassifier, StatementParser};

use super::{emit, load_config, require_file};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Statement PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the delay between model calls, in milliseconds
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Print a per-category count after the transactions
    #[arg(long)]
    summary: bool,
}

/// Pacing gate that also advances a progress bar on every model call.
struct ProgressGate {
    inner: FixedIntervalGate,
    pb: ProgressBar,
}

#[async_trait]
impl RateLimiter for ProgressGate {
    async fn acquire(&self) {
        self.inner.acquire().await;
        self.pb.inc(1);
    }

    fn reset(&self) {
        self.inner.reset();
    }
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;
    if let Some(pacing_ms) = args.pacing_ms {
        config.categorizer.pacing_ms = pacing_ms;
    }

    require_file(&args.input)?;

    let ocr = DocumentAiClient::from_config(&config)?;
    let model = VertexGeminiClient::from_config(&config)?;

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message("Running OCR...");

    let parser = StatementParser::new(ocr)
        .with_classifier(HeaderClassifier::from_config(&config.classifier))
        .with_mime_type(config.document_ai.mime_type.clone());
    let transactions = parser.try_parse(&args.input).await?;
    pb.finish_and_clear();

    eprintln!(
        "{} Extracted {} transactions",
        style("ℹ").blue(),
        transactions.len()
    );

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    pb.set_message("categorizing");

    let gate = ProgressGate {
        inner: FixedIntervalGate::from_millis(config.categorizer.pacing_ms),
        pb: pb.clone(),
    };
    let categorizer = Categorizer::new(model, gate)
        .with_description_keys(config.categorizer.description_keys.iter().cloned());

    let items: Vec<Value> = transactions.into_iter().map(Value::Object).collect();
    pb.set_length(model_calls(&categorizer, &items));
    let items = categorizer.categorize(items).await;
    pb.finish_with_message("done");

    emit(&serde_json::to_string_pretty(&items)?, args.output.as_deref())?;

    if args.summary {
        print_summary(&items);
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

/// Number of items the categorizer will send to the model.
fn model_calls<C: TextClassifier, R: RateLimiter>(
    categorizer: &Categorizer<C, R>,
    items: &[Value],
) -> u64 {
    items
        .iter()
        .filter_map(Value::as_object)
        .filter(|record| {
            categorizer
                .description(record)
                .is_some_and(|d| !d.is_empty())
        })
        .count() as u64
}

fn print_summary(items: &[Value]) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        if let Some(category) = item.get("category").and_then(Value::as_str) {
            *counts.entry(category).or_insert(0) += 1;
        }
    }

    eprintln!();
    eprintln!("{}", style("Categories:").bold());
    for (category, count) in counts {
        eprintln!("  {:<28} {:>5}", category, count);
    }
}
