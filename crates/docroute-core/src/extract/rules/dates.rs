//! Date extraction.
//!
//! Matches are kept as text: the bundle orders dates by the matched string,
//! not by calendar value, so `01/12/2023` sorts before `15/03/2022`.

use std::collections::BTreeSet;

use super::patterns::{DATE_DMY_DASH, DATE_DMY_SLASH, DATE_YMD};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::document::DocumentDate;

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<DocumentDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// All matches in pattern order (DD/MM/YYYY, DD-MM-YYYY, YYYY-MM-DD),
    /// duplicates included.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for pattern in [&*DATE_DMY_SLASH, &*DATE_DMY_DASH, &*DATE_YMD] {
            for m in pattern.find_iter(text) {
                if let Some(date) = DocumentDate::parse(m.as_str()) {
                    results.push(
                        ExtractionMatch::new(date, m.as_str()).with_position(m.start(), m.end()),
                    );
                }
            }
        }

        results
    }
}

/// Extract distinct dates, sorted by matched text.
pub fn extract_dates(text: &str) -> Vec<DocumentDate> {
    DateExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
