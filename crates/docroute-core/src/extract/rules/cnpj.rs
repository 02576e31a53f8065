//! CNPJ (Brazilian company registry number) extraction and validation.

use std::collections::BTreeSet;

use super::patterns::{CNPJ_PATTERN, CNPJ_STANDALONE};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::document::Identifier;

/// CNPJ field extractor.
///
/// The punctuated pattern only covers head-office numbers (`/0001-`); branch
/// numbers are picked up when written as 14 bare digits.
pub struct CnpjExtractor;

impl CnpjExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CnpjExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CnpjExtractor {
    type Output = ExtractionMatch<Identifier>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for pattern in [&*CNPJ_PATTERN, &*CNPJ_STANDALONE] {
            for m in pattern.find_iter(text) {
                let Some(id) = Identifier::organization(m.as_str()) else {
                    continue;
                };

                // Bare head-office numbers match both patterns
                if results.iter().any(|r| r.value == id) {
                    continue;
                }

                results.push(ExtractionMatch::new(id, m.as_str()).with_position(m.start(), m.end()));
            }
        }

        results
    }
}

/// Extract the distinct valid CNPJs of a text.
pub fn extract_cnpjs(text: &str) -> BTreeSet<Identifier> {
    CnpjExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// Validate a CNPJ using its two check digits.
///
/// Non-digits are ignored; fourteen digits are required.
/// First digit: weights [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2] over 12 digits.
/// Second digit: weights [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2] over 13 digits.
/// Each digit is `sum % 11`, mapped to 0 below 2 and to `11 - r` otherwise.
pub fn validate_cnpj(cnpj: &str) -> bool {
    let digits: Vec<u32> = cnpj.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 14 {
        return false;
    }

    const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let check = |weights: &[u32]| {
        let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
        match sum % 11 {
            r if r < 2 => 0,
            r => 11 - r,
        }
    };

    check(&FIRST) == digits[12] && check(&SECOND) == digits[13]
}

/// Format CNPJ as `XX.XXX.XXX/XXXX-XX`.
pub fn format_cnpj(cnpj: &str) -> String {
    let digits: String = cnpj.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 14 {
        return cnpj.to_string();
    }

    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}
