//! Common regex patterns for Brazilian document extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CPF (individual tax ID): 123.456.789-09 or 12345678909
    pub static ref CPF_PATTERN: Regex = Regex::new(
        r"\b\d{3}\.?\d{3}\.?\d{3}-?\d{2}\b"
    ).unwrap();

    // CNPJ (company tax ID), head-office grouping: 11.222.333/0001-81
    pub static ref CNPJ_PATTERN: Regex = Regex::new(
        r"\b\d{2}\.?\d{3}\.?\d{3}/?0001-?\d{2}\b"
    ).unwrap();

    pub static ref CNPJ_STANDALONE: Regex = Regex::new(
        r"\b\d{14}\b"
    ).unwrap();

    // Dates
    pub static ref DATE_DMY_SLASH: Regex = Regex::new(
        r"\b\d{2}/\d{2}/\d{4}\b"
    ).unwrap();

    pub static ref DATE_DMY_DASH: Regex = Regex::new(
        r"\b\d{2}-\d{2}-\d{4}\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b\d{4}-\d{2}-\d{2}\b"
    ).unwrap();

    // Amounts (Brazilian format: R$ 1.234,56)
    pub static ref AMOUNT_WITH_CURRENCY: Regex = Regex::new(
        r"R\$\s*\d{1,3}(?:\.\d{3})*,\d{2}"
    ).unwrap();

    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"\d{1,3}(?:\.\d{3})*,\d{2}"
    ).unwrap();
}
