//! Error types for the stmtscan-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the stmtscan library.
#[derive(Error, Debug)]
pub enum StmtError {
    /// OCR service error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Text-classification model error.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Input file does not exist or is not a regular file.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while talking to the document OCR service.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response did not contain a document.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors raised while talking to the text-classification model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The model produced no candidate text (blocked or empty).
    #[error("model returned no text{}", .0.as_deref().map(|r| format!(" (finish reason: {r})")).unwrap_or_default())]
    EmptyResponse(Option<String>),
}

/// Result type for the stmtscan library.
pub type Result<T> = std::result::Result<T, StmtError>;
