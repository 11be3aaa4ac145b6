//! String-in, JSON-out entry points for agent tool integration.
//!
//! These never fail: every error is logged and turned into an empty (or
//! uncategorized) JSON array, so callers cannot tell "no transactions" from
//! "extraction failed".

use std::path::Path;

use serde_json::Value;
use tracing::error;

use crate::categorize::{Categorizer, FixedIntervalGate, RateLimiter, TextClassifier, VertexGeminiClient};
use crate::models::config::AppConfig;
use crate::models::transaction::{Category, CATEGORY_KEY};
use crate::ocr::{DocumentAiClient, DocumentProcessor};
use crate::recovery::recover;
use crate::statement::{HeaderClassifier, StatementParser};

const EMPTY_ARRAY: &str = "[]";

/// Parse a bank statement PDF with Document AI and return its transactions as a JSON array.
pub async fn parse_statement_json(config: &AppConfig, file_path: &str) -> String {
    let path = Path::new(file_path);
    if !path.is_file() {
        error!("File not found at path: {}", file_path);
        return EMPTY_ARRAY.to_string();
    }

    let client = match DocumentAiClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Cannot parse statement: {}", e);
            return EMPTY_ARRAY.to_string();
        }
    };

    let parser = StatementParser::new(client)
        .with_classifier(HeaderClassifier::from_config(&config.classifier))
        .with_mime_type(config.document_ai.mime_type.clone());

    parse_statement_json_with(&parser, path).await
}

/// Same as [`parse_statement_json`] with an explicit parser.
pub async fn parse_statement_json_with<P: DocumentProcessor>(
    parser: &StatementParser<P>,
    path: &Path,
) -> String {
    let transactions = parser.parse(path).await;
    serde_json::to_string(&transactions).unwrap_or_else(|e| {
        error!("Failed to serialize transactions: {}", e);
        EMPTY_ARRAY.to_string()
    })
}

/// Categorize a (possibly wrapped) transactions payload with Vertex AI.
///
/// When the model client cannot be configured every transaction is marked
/// `Uncategorized`.
pub async fn categorize_transactions_json(config: &AppConfig, transactions_json: &str) -> String {
    match VertexGeminiClient::from_config(config) {
        Ok(client) => {
            let categorizer = Categorizer::new(
                client,
                FixedIntervalGate::from_millis(config.categorizer.pacing_ms),
            )
            .with_description_keys(config.categorizer.description_keys.iter().cloned());
            categorize_transactions_json_with(&categorizer, transactions_json).await
        }
        Err(e) => {
            error!("Model not configured, cannot categorize: {}", e);
            let mut items = recover(transactions_json);
            for item in items.iter_mut() {
                if let Value::Object(record) = item {
                    record.insert(
                        CATEGORY_KEY.to_string(),
                        Value::from(Category::Uncategorized.as_str()),
                    );
                }
            }
            to_pretty_json(&items)
        }
    }
}

/// Same as [`categorize_transactions_json`] with an explicit categorizer.
pub async fn categorize_transactions_json_with<C, R>(
    categorizer: &Categorizer<C, R>,
    transactions_json: &str,
) -> String
where
    C: TextClassifier,
    R: RateLimiter,
{
    let items = recover(transactions_json);
    let items = categorizer.categorize(items).await;
    to_pretty_json(&items)
}

fn to_pretty_json(items: &[Value]) -> String {
    serde_json::to_string_pretty(items).unwrap_or_else(|e| {
        error!("Failed to serialize transactions: {}", e);
        EMPTY_ARRAY.to_string()
    })
}
