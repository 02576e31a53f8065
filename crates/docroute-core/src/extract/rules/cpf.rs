//! CPF (Brazilian individual taxpayer number) extraction and validation.

use std::collections::BTreeSet;

use super::patterns::CPF_PATTERN;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::document::Identifier;

/// CPF field extractor. Only checksum-valid candidates are returned.
pub struct CpfExtractor;

impl CpfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CpfExtractor {
    type Output = ExtractionMatch<Identifier>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CPF_PATTERN
            .find_iter(text)
            .filter_map(|m| {
                Identifier::person(m.as_str())
                    .map(|id| ExtractionMatch::new(id, m.as_str()).with_position(m.start(), m.end()))
            })
            .collect()
    }
}

/// Extract the distinct valid CPFs of a text.
pub fn extract_cpfs(text: &str) -> BTreeSet<Identifier> {
    CpfExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// Validate a CPF using its two check digits.
///
/// Non-digits are ignored. Eleven digits are required and repeated-digit
/// sequences such as `111.111.111-11` are rejected.
/// First digit: weights 10..2 over the first 9 digits.
/// Second digit: weights 11..2 over the first 10 digits.
/// Each digit is `(sum * 10 % 11) % 10`.
pub fn validate_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let check = |len: usize| {
        let top = len as u32 + 1;
        let sum: u32 = digits
            .iter()
            .take(len)
            .enumerate()
            .map(|(i, d)| d * (top - i as u32))
            .sum();
        (sum * 10 % 11) % 10
    };

    check(9) == digits[9] && check(10) == digits[10]
}

/// Format CPF as `XXX.XXX.XXX-XX`.
pub fn format_cpf(cpf: &str) -> String {
    let digits: String = cpf.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 11 {
        return cpf.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}
