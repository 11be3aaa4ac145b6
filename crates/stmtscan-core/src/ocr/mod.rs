//! Document OCR service abstraction.
//!
//! The statement parser only depends on [`DocumentProcessor`]; the
//! Document AI REST client is one implementation of it.

mod document_ai;

pub use document_ai::DocumentAiClient;

use async_trait::async_trait;

use crate::error::OcrError;
use crate::models::document::Document;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// An external service that turns raw file bytes into a structured [`Document`].
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    /// Process one document. Called once per file, without retries.
    async fn process(&self, content: &[u8], mime_type: &str) -> Result<Document>;
}
