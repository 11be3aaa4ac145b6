//! Core library for bank statement transaction extraction.
//!
//! This crate provides:
//! - Transaction table selection over Document AI OCR output
//! - Recovery of transaction lists from loosely-wrapped JSON payloads
//! - Transaction categorization through a Vertex AI Gemini model
//! - String-in, JSON-out tool entry points that never fail

pub mod categorize;
pub mod error;
pub mod models;
pub mod ocr;
pub mod recovery;
pub mod statement;
pub mod tools;

pub use categorize::{Categorizer, FixedIntervalGate, RateLimiter, TextClassifier, VertexGeminiClient};
pub use error::{ModelError, OcrError, Result, StmtError};
pub use models::{AppConfig, Category, Document, TransactionRecord};
pub use ocr::{DocumentAiClient, DocumentProcessor};
pub use recovery::{recover, Payload};
pub use statement::{HeaderClassifier, StatementParser};
pub use tools::{categorize_transactions_json, parse_statement_json};
