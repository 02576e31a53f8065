//! Builds the attribute bundle of a document from its text.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::config::ExtractionConfig;
use crate::models::document::{AttributeBundle, RawDocument};

use super::classifier::DocumentClassifier;
use super::rules::{detect_bank, extract_amounts, extract_cnpjs, extract_cpfs, extract_dates};

/// Message recorded when a document arrives without text.
pub const NO_TEXT_WARNING: &str = "Sem texto extraído";

/// Result of analyzing one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted attributes.
    pub bundle: AttributeBundle,
    /// Whether the document carried any text.
    pub text_extracted: bool,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Runs every field extractor and the classifier over a text.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    preview_chars: usize,
    max_amounts: usize,
    classifier: DocumentClassifier,
}

impl DocumentExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            preview_chars: config.preview_chars,
            max_amounts: config.max_amounts,
            classifier: DocumentClassifier::new(),
        }
    }

    /// Set the preview length in characters.
    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    /// Set how many amounts the bundle keeps.
    pub fn with_max_amounts(mut self, max: usize) -> Self {
        self.max_amounts = max;
        self
    }

    /// Build the bundle for a text. Pure and total.
    pub fn extract(&self, text: &str) -> AttributeBundle {
        AttributeBundle {
            person_ids: extract_cpfs(text),
            organization_ids: extract_cnpjs(text),
            bank: detect_bank(text),
            document_type: self.classifier.classify(text).map(|c| c.document_type),
            dates: extract_dates(text),
            amounts: extract_amounts(text, self.max_amounts),
            preview: self.preview(text),
        }
    }

    /// Analyze a document, reporting missing text instead of failing.
    pub fn analyze(&self, document: &RawDocument) -> ExtractionResult {
        let start = Instant::now();

        if !document.has_text() {
            warn!(file = %document.file_name, "no text extracted (image-only scan?)");
            return ExtractionResult {
                bundle: AttributeBundle::default(),
                text_extracted: false,
                warnings: vec![NO_TEXT_WARNING.to_string()],
                processing_time_ms: start.elapsed().as_millis() as u64,
            };
        }

        info!(
            file = %document.file_name,
            "Analyzing {} characters of text",
            document.text.chars().count()
        );

        let bundle = self.extract(&document.text);
        let mut warnings = Vec::new();

        if bundle.document_type.is_none() {
            warnings.push("Could not classify document type".to_string());
        }
        if bundle.dates.is_empty() {
            warnings.push("No dates found".to_string());
        }

        debug!(
            cpfs = bundle.person_ids.len(),
            cnpjs = bundle.organization_ids.len(),
            bank = ?bundle.bank,
            document_type = ?bundle.document_type,
            dates = bundle.dates.len(),
            amounts = bundle.amounts.len(),
            "extraction finished"
        );

        ExtractionResult {
            bundle,
            text_extracted: true,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn preview(&self, text: &str) -> String {
        text.chars()
            .take(self.preview_chars)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect()
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-document record in the legacy report layout.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// Source path as given.
    pub file: String,
    /// Source file name.
    pub file_name: String,
    /// Size in kilobytes.
    pub size_kb: f64,
    /// Modification date, `YYYY-MM-DD`.
    pub modified: String,
    /// Extracted attributes.
    #[serde(flatten)]
    pub bundle: AttributeBundle,
    /// Keywords of the winning document type.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<&'static str>,
    /// Set when no text was extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentReport {
    pub fn new(file: impl Into<String>, document: &RawDocument, result: &ExtractionResult) -> Self {
        let keywords = result
            .bundle
            .document_type
            .map(|t| super::classifier::keywords_for(t).to_vec())
            .unwrap_or_default();

        Self {
            file: file.into(),
            file_name: document.file_name.clone(),
            size_kb: document.size_kb(),
            modified: document.modified.format("%Y-%m-%d").to_string(),
            bundle: result.bundle.clone(),
            keywords,
            error: (!result.text_extracted).then(|| NO_TEXT_WARNING.to_string()),
        }
    }
}
