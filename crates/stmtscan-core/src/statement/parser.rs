//! Statement parser: OCR the file, pick the ledger tables, emit one record per row.

use std::path::Path;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::classifier::{normalize, HeaderClassifier};
use super::text::layout_text;
use crate::error::{Result, StmtError};
use crate::models::document::{Document, TableRow};
use crate::models::transaction::TransactionRecord;
use crate::ocr::DocumentProcessor;

/// Result of table extraction over one document.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    /// Records from every qualifying table, in page, table and row order.
    pub transactions: Vec<TransactionRecord>,
    /// Number of tables that were recognized as transaction tables.
    pub matched_tables: usize,
    /// Number of body rows dropped for having fewer cells than headers.
    pub skipped_rows: usize,
}

/// Extracts transaction records from bank statement files.
pub struct StatementParser<P: DocumentProcessor> {
    processor: P,
    classifier: HeaderClassifier,
    mime_type: String,
}

impl<P: DocumentProcessor> StatementParser<P> {
    /// Create a parser using the default header keywords and PDF input.
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            classifier: HeaderClassifier::default(),
            mime_type: "application/pdf".to_string(),
        }
    }

    /// Set the header classifier.
    pub fn with_classifier(mut self, classifier: HeaderClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the MIME type sent to the OCR service.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Parse a statement file, returning an empty list on any failure.
    pub async fn parse(&self, path: &Path) -> Vec<TransactionRecord> {
        match self.try_parse(path).await {
            Ok(transactions) => transactions,
            Err(e) => {
                error!("Failed to parse statement {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Parse a statement file, propagating failures.
    pub async fn try_parse(&self, path: &Path) -> Result<Vec<TransactionRecord>> {
        let start = Instant::now();

        if !path.is_file() {
            return Err(StmtError::InputNotFound(path.to_path_buf()));
        }
        let content = std::fs::read(path)?;

        let document = self.processor.process(&content, &self.mime_type).await?;
        info!(
            "OCR processed {} pages for {}",
            document.pages.len(),
            path.display()
        );

        let result = self.extract(&document);
        if result.matched_tables == 0 {
            warn!(
                "No tables matching transaction criteria found in {}",
                path.display()
            );
        }

        info!(
            "Extracted {} transaction rows from {} table(s)",
            result.transactions.len(),
            result.matched_tables
        );
        debug!("Total parse time: {:?}", start.elapsed());

        Ok(result.transactions)
    }

    /// Extract transaction records from an already-processed document.
    pub fn extract(&self, document: &Document) -> ExtractionResult {
        let mut result = ExtractionResult::default();

        for (page_idx, page) in document.pages.iter().enumerate() {
            let page_number = page_idx + 1;
            debug!("Scanning page {} with {} tables", page_number, page.tables.len());

            for (table_idx, table) in page.tables.iter().enumerate() {
                let table_number = table_idx + 1;

                let Some(header_row) = table.header_rows.first() else {
                    debug!(
                        "Skipping table {} on page {} (no header rows)",
                        table_number, page_number
                    );
                    continue;
                };

                let headers = row_texts(&document.text, header_row);
                info!("Table {} headers: {:?}", table_number, headers);

                if !self.classifier.is_transaction_table(&headers) {
                    continue;
                }

                info!(
                    "Found transaction table (table {}) on page {}",
                    table_number, page_number
                );
                result.matched_tables += 1;

                let keys: Vec<String> = headers.iter().map(|h| normalize(h)).collect();

                for (row_idx, body_row) in table.body_rows.iter().enumerate() {
                    let values = row_texts(&document.text, body_row);

                    if values.len() < keys.len() {
                        warn!(
                            "Skipping row {} in table {} (page {}) due to cell count mismatch (headers: {}, cells: {}) row: {:?}",
                            row_idx + 1,
                            table_number,
                            page_number,
                            keys.len(),
                            values.len(),
                            values
                        );
                        result.skipped_rows += 1;
                        continue;
                    }

                    let record: TransactionRecord = keys
                        .iter()
                        .cloned()
                        .zip(values.into_iter().map(Value::String))
                        .collect();
                    result.transactions.push(record);
                }
            }
        }

        result
    }
}

fn row_texts(text: &str, row: &TableRow) -> Vec<String> {
    row.cells
        .iter()
        .map(|cell| layout_text(text, cell.layout.as_ref()))
        .collect()
}
