//! Data models shared across the pipeline.

pub mod config;
pub mod document;
pub mod transaction;

pub use config::AppConfig;
pub use document::{Document, Layout, Page, Table, TableCell, TableRow, TextAnchor, TextSegment};
pub use transaction::{Category, TransactionRecord, CATEGORY_KEY};
