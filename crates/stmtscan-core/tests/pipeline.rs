//! End-to-end: OCR document -> transactions JSON -> wrapped payload -> categorized JSON.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use stmtscan_core::categorize::{Categorizer, FixedIntervalGate, TextClassifier};
use stmtscan_core::error::ModelError;
use stmtscan_core::models::Document;
use stmtscan_core::ocr::DocumentProcessor;
use stmtscan_core::statement::StatementParser;
use stmtscan_core::tools::{categorize_transactions_json_with, parse_statement_json_with};

/// Builds Document AI JSON with cells anchored into a shared text buffer.
struct Fixture {
    text: String,
}

impl Fixture {
    fn new() -> Self {
        Self { text: String::new() }
    }

    fn row(&mut self, cells: &[&str]) -> Value {
        let cells: Vec<Value> = cells
            .iter()
            .map(|c| {
                let start = self.text.len();
                self.text.push_str(c);
                let end = self.text.len();
                self.text.push('\n');
                json!({"layout": {"textAnchor": {"textSegments": [
                    {"startIndex": start.to_string(), "endIndex": end.to_string()}
                ]}}})
            })
            .collect();
        json!({ "cells": cells })
    }
}

fn statement_document() -> Document {
    let mut f = Fixture::new();

    let account = json!({
        "headerRows": [f.row(&["Account Number", "Statement Period"])],
        "bodyRows": [f.row(&["****1234", "Jan 2024"])]
    });
    let ledger = json!({
        "headerRows": [f.row(&["Date", "Description", "Withdrawal Amount", "Deposit Amount"])],
        "bodyRows": [
            f.row(&["01/03", "WHOLE FOODS #123", "54.20", ""]),
            f.row(&["01/05", "NETFLIX.COM"]),
            f.row(&["01/15", "ACME CORP PAYROLL", "", "2,500.00"]),
        ]
    });
    let continued = json!({
        "headerRows": [f.row(&["Posting Date", "Transaction Details", "Amount"])],
        "bodyRows": [f.row(&["01/20", "ATM WITHDRAWAL", "-100.00"])]
    });

    serde_json::from_value(json!({
        "text": f.text,
        "pages": [
            {"pageNumber": 1, "tables": [account, ledger]},
            {"pageNumber": 2, "tables": [continued]}
        ]
    }))
    .unwrap()
}

struct FixtureProcessor(Document);

#[async_trait]
impl DocumentProcessor for FixtureProcessor {
    async fn process(&self, _content: &[u8], _mime_type: &str) -> stmtscan_core::ocr::Result<Document> {
        Ok(self.0.clone())
    }
}

/// Answers by keyword in the quoted description.
#[derive(Default)]
struct KeywordModel;

#[async_trait]
impl TextClassifier for KeywordModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let answer = if prompt.contains("\"WHOLE FOODS") {
            "Groceries"
        } else if prompt.contains("\"ACME CORP PAYROLL\"") {
            "Income/Salary\n"
        } else {
            "Cash"
        };
        Ok(answer.to_string())
    }
}

#[tokio::test]
async fn test_statement_to_categorized_transactions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("january.pdf");
    std::fs::write(&path, b"%PDF-1.4 fixture").unwrap();

    let parser = StatementParser::new(FixtureProcessor(statement_document()));
    let parsed = parse_statement_json_with(&parser, &path).await;

    let transactions: Value = serde_json::from_str(&parsed).unwrap();
    assert_eq!(
        transactions,
        json!([
            {"date": "01/03", "description": "WHOLE FOODS #123", "withdrawal amount": "54.20", "deposit amount": ""},
            {"date": "01/15", "description": "ACME CORP PAYROLL", "withdrawal amount": "", "deposit amount": "2,500.00"},
            {"posting date": "01/20", "transaction details": "ATM WITHDRAWAL", "amount": "-100.00"}
        ])
    );

    // An intermediate text step hands the list back wrapped in a string.
    let wrapped = format!(r#"{{"result": {}}}"#, serde_json::to_string(&parsed).unwrap());

    let categorizer = Categorizer::new(KeywordModel::default(), FixedIntervalGate::from_millis(0));
    let categorized = categorize_transactions_json_with(&categorizer, &wrapped).await;

    let categorized: Value = serde_json::from_str(&categorized).unwrap();
    let categories: Vec<&str> = categorized
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["category"].as_str())
        .collect();
    assert_eq!(categories, vec!["Groceries", "Income/Salary", "Uncategorized"]);
    assert_eq!(categorized[0]["description"], "WHOLE FOODS #123");
}

#[tokio::test]
async fn test_unrecoverable_payload_yields_empty_array() {
    let categorizer = Categorizer::new(KeywordModel::default(), FixedIntervalGate::from_millis(0));
    let out = categorize_transactions_json_with(&categorizer, "not json at all").await;

    assert_eq!(out, "[]");
}
