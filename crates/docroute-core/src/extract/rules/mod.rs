//! Rule-based field extractors for Brazilian financial documents.

pub mod amounts;
pub mod bank;
pub mod cnpj;
pub mod cpf;
pub mod dates;
pub mod patterns;

pub use amounts::{extract_amounts, parse_brl_amount, AmountExtractor};
pub use bank::{detect_bank, BankDetector, BANK_KEYWORDS};
pub use cnpj::{extract_cnpjs, format_cnpj, validate_cnpj, CnpjExtractor};
pub use cpf::{extract_cpfs, format_cpf, validate_cpf, CpfExtractor};
pub use dates::{extract_dates, DateExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in the text, with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
