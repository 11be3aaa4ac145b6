//! Bank statement table extraction.

pub mod classifier;
mod parser;
pub mod text;

pub use classifier::HeaderClassifier;
pub use parser::{ExtractionResult, StatementParser};
pub use text::layout_text;
