//! Bank identification by keyword.

use super::{ExtractionMatch, FieldExtractor};
use crate::models::document::Bank;

/// Bank keyword table. Order matters: the first bank with any keyword
/// present in the text wins.
pub const BANK_KEYWORDS: &[(Bank, &[&str])] = &[
    (Bank::Itau, &["itau", "itaú", "banco itau", "banco itaú"]),
    (Bank::Bradesco, &["bradesco", "banco bradesco"]),
    (Bank::Santander, &["santander", "banco santander"]),
    (Bank::BancoDoBrasil, &["banco do brasil", "bb", "banco brasil"]),
    (Bank::Caixa, &["caixa", "caixa econômica", "caixa economica", "cef"]),
    (Bank::Nubank, &["nubank", "nu pagamentos"]),
    (Bank::Inter, &["inter", "banco inter"]),
    (Bank::Sicoob, &["sicoob"]),
    (Bank::Sicredi, &["sicredi"]),
    (Bank::Safra, &["safra", "banco safra"]),
];

/// Bank detector. Matching is case-insensitive substring containment.
pub struct BankDetector;

impl BankDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BankDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BankDetector {
    type Output = ExtractionMatch<Bank>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let lowered = text.to_lowercase();

        BANK_KEYWORDS.iter().find_map(|(bank, keywords)| {
            keywords
                .iter()
                .find(|keyword| lowered.contains(*keyword))
                .map(|keyword| ExtractionMatch::new(bank.clone(), *keyword))
        })
    }

    /// Every bank with a keyword in the text, in table order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lowered = text.to_lowercase();

        BANK_KEYWORDS
            .iter()
            .filter_map(|(bank, keywords)| {
                keywords
                    .iter()
                    .find(|keyword| lowered.contains(*keyword))
                    .map(|keyword| ExtractionMatch::new(bank.clone(), *keyword))
            })
            .collect()
    }
}

/// Detect the bank of a document (first table match).
pub fn detect_bank(text: &str) -> Option<Bank> {
    BankDetector::new().extract(text).map(|m| m.value)
}
