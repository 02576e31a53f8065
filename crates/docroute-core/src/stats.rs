//! Per-run counters, owned by whoever drives the run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::models::document::DocumentType;

/// Key used in [`RunStats::by_type`] for unclassified documents.
pub const UNCLASSIFIED: &str = "unclassified";

/// What happened to one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentOutcome {
    pub file: PathBuf,
    pub document_type: Option<DocumentType>,
    pub text_extracted: bool,
    /// Paths the document was copied to.
    pub placed: Vec<PathBuf>,
    /// First error hit while processing, if any.
    pub error: Option<String>,
}

impl DocumentOutcome {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            ..Default::default()
        }
    }

    /// Placed somewhere without errors.
    pub fn is_filed(&self) -> bool {
        self.error.is_none() && !self.placed.is_empty()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Totals over a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total: usize,
    pub filed: usize,
    pub failed: usize,
    /// Documents that matched no rule.
    pub unrouted: usize,
    pub no_text: usize,
    pub by_type: BTreeMap<String, usize>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &DocumentOutcome) {
        self.total += 1;

        if outcome.is_failed() {
            self.failed += 1;
        } else if outcome.is_filed() {
            self.filed += 1;
        } else {
            self.unrouted += 1;
        }

        if !outcome.text_extracted {
            self.no_text += 1;
        }

        let key = outcome
            .document_type
            .map(|t| t.key())
            .unwrap_or(UNCLASSIFIED);
        *self.by_type.entry(key.to_string()).or_insert(0) += 1;
    }

    /// Combine the counters of two runs.
    pub fn merge(mut self, other: RunStats) -> RunStats {
        self.total += other.total;
        self.filed += other.filed;
        self.failed += other.failed;
        self.unrouted += other.unrouted;
        self.no_text += other.no_text;
        for (key, count) in other.by_type {
            *self.by_type.entry(key).or_insert(0) += count;
        }
        self
    }

    /// Share of documents filed, in percent.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.filed as f64 / self.total as f64 * 100.0
    }
}
