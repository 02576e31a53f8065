//! Entity extraction and document classification.

pub mod classifier;
mod extractor;
pub mod rules;

pub use classifier::{classify, Classification, DocumentClassifier};
pub use extractor::{DocumentExtractor, DocumentReport, ExtractionResult, NO_TEXT_WARNING};
