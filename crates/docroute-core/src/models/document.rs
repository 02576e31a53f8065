//! Document data models: raw input, validated identifiers, extracted
//! attributes and the bundle that feeds routing.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::extract::rules::cnpj::{format_cnpj, validate_cnpj};
use crate::extract::rules::cpf::{format_cpf, validate_cpf};

/// A document as handed over by the text-extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Full extracted text. Empty when nothing could be extracted.
    pub text: String,

    /// File name of the source document.
    pub file_name: String,

    /// Size of the source file in bytes.
    pub file_size: u64,

    /// Last modification timestamp of the source file.
    pub modified: NaiveDateTime,
}

impl RawDocument {
    pub fn new(
        text: impl Into<String>,
        file_name: impl Into<String>,
        file_size: u64,
        modified: NaiveDateTime,
    ) -> Self {
        Self {
            text: text.into(),
            file_name: file_name.into(),
            file_size,
            modified,
        }
    }

    /// Build a document from text alone (no backing file).
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let file_size = text.len() as u64;
        Self {
            text,
            file_name: String::new(),
            file_size,
            modified: NaiveDateTime::default(),
        }
    }

    /// Whether the extraction collaborator produced any usable text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// File size in kilobytes.
    pub fn size_kb(&self) -> f64 {
        self.file_size as f64 / 1024.0
    }

    /// Lowercased extension of the source file name, if any.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

/// Kind of Brazilian tax identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    /// CPF, 11 digits (individuals).
    Person,
    /// CNPJ, 14 digits (legal entities).
    Organization,
}

/// A checksum-validated CPF or CNPJ.
///
/// Serialized as its formatted display string. Deserialization infers the
/// kind from the digit count and rejects invalid checksums.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    kind: IdKind,
    digits: String,
    formatted: String,
}

impl Identifier {
    /// Validate and canonicalize a CPF candidate.
    pub fn person(candidate: &str) -> Option<Self> {
        if !validate_cpf(candidate) {
            return None;
        }
        let digits = only_digits(candidate);
        Some(Self {
            kind: IdKind::Person,
            formatted: format_cpf(&digits),
            digits,
        })
    }

    /// Validate and canonicalize a CNPJ candidate.
    pub fn organization(candidate: &str) -> Option<Self> {
        if !validate_cnpj(candidate) {
            return None;
        }
        let digits = only_digits(candidate);
        Some(Self {
            kind: IdKind::Organization,
            formatted: format_cnpj(&digits),
            digits,
        })
    }

    pub fn kind(&self) -> IdKind {
        self.kind
    }

    /// Bare digit string (11 or 14 digits).
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Punctuated display form.
    pub fn formatted(&self) -> &str {
        &self.formatted
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

impl TryFrom<String> for Identifier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let parsed = match only_digits(&value).len() {
            11 => Identifier::person(&value),
            14 => Identifier::organization(&value),
            _ => None,
        };
        parsed.ok_or_else(|| format!("invalid CPF/CNPJ: {}", value))
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.formatted
    }
}

/// A positive monetary value found in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryAmount {
    /// Parsed value, two fractional digits.
    #[serde(alias = "valor")]
    pub value: Decimal,

    /// Text as matched in the document (e.g. `R$ 1.234,56`).
    #[serde(alias = "texto")]
    pub text: String,
}

impl MonetaryAmount {
    pub fn new(value: Decimal, text: impl Into<String>) -> Self {
        Self {
            value: value.round_dp(2),
            text: text.into(),
        }
    }

    /// Format as used in file names: `R$1234,56`.
    pub fn file_label(&self) -> String {
        format!("R${:.2}", self.value).replace('.', ",")
    }
}

/// Textual layout of a matched date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `DD/MM/YYYY`
    DayMonthYearSlash,
    /// `DD-MM-YYYY`
    DayMonthYearDash,
    /// `YYYY-MM-DD`
    YearMonthDay,
}

impl DateFormat {
    /// Detect the layout of a 10-character date string.
    pub fn detect(raw: &str) -> Option<Self> {
        let bytes = raw.as_bytes();
        if bytes.len() != 10 {
            return None;
        }
        let digits_at = |positions: &[usize]| positions.iter().all(|&i| bytes[i].is_ascii_digit());

        if digits_at(&[0, 1, 3, 4, 6, 7, 8, 9]) && bytes[2] == bytes[5] {
            return match bytes[2] {
                b'/' => Some(DateFormat::DayMonthYearSlash),
                b'-' => Some(DateFormat::DayMonthYearDash),
                _ => None,
            };
        }
        if digits_at(&[0, 1, 2, 3, 5, 6, 8, 9]) && bytes[4] == b'-' && bytes[7] == b'-' {
            return Some(DateFormat::YearMonthDay);
        }
        None
    }
}

/// A date as matched in the text. Date-only, no timezone.
///
/// Ordering and equality follow the raw matched text, not the calendar value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentDate {
    raw: String,
    format: DateFormat,
}

impl DocumentDate {
    pub fn parse(raw: &str) -> Option<Self> {
        DateFormat::detect(raw).map(|format| Self {
            raw: raw.to_string(),
            format,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn format(&self) -> DateFormat {
        self.format
    }

    /// Four-digit year component.
    pub fn year(&self) -> &str {
        match self.format {
            DateFormat::YearMonthDay => &self.raw[0..4],
            _ => &self.raw[6..10],
        }
    }

    /// Two-digit month component.
    pub fn month(&self) -> &str {
        match self.format {
            DateFormat::YearMonthDay => &self.raw[5..7],
            _ => &self.raw[3..5],
        }
    }

    /// Two-digit day component.
    pub fn day(&self) -> &str {
        match self.format {
            DateFormat::YearMonthDay => &self.raw[8..10],
            _ => &self.raw[0..2],
        }
    }

    /// Calendar date, if the components form a real date.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let year = self.year().parse().ok()?;
        let month = self.month().parse().ok()?;
        let day = self.day().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

impl fmt::Display for DocumentDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for DocumentDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DocumentDate::parse(&value).ok_or_else(|| format!("unrecognized date: {}", value))
    }
}

impl From<DocumentDate> for String {
    fn from(date: DocumentDate) -> Self {
        date.raw
    }
}

/// Brazilian banks recognized in document text, in detection order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bank {
    #[serde(rename = "itau")]
    Itau,
    #[serde(rename = "bradesco")]
    Bradesco,
    #[serde(rename = "santander")]
    Santander,
    #[serde(rename = "bb")]
    BancoDoBrasil,
    #[serde(rename = "caixa")]
    Caixa,
    #[serde(rename = "nubank")]
    Nubank,
    #[serde(rename = "inter")]
    Inter,
    #[serde(rename = "sicoob")]
    Sicoob,
    #[serde(rename = "sicredi")]
    Sicredi,
    #[serde(rename = "safra")]
    Safra,

    /// Bank supplied by an external bundle that is not in the table.
    #[serde(untagged)]
    Other(String),
}

impl Bank {
    /// Short key used in bundles.
    pub fn key(&self) -> &str {
        match self {
            Bank::Itau => "itau",
            Bank::Bradesco => "bradesco",
            Bank::Santander => "santander",
            Bank::BancoDoBrasil => "bb",
            Bank::Caixa => "caixa",
            Bank::Nubank => "nubank",
            Bank::Inter => "inter",
            Bank::Sicoob => "sicoob",
            Bank::Sicredi => "sicredi",
            Bank::Safra => "safra",
            Bank::Other(raw) => raw,
        }
    }

    /// Folder-safe display name.
    pub fn display_name(&self) -> String {
        match self {
            Bank::Itau => "Itau".to_string(),
            Bank::Bradesco => "Bradesco".to_string(),
            Bank::Santander => "Santander".to_string(),
            Bank::BancoDoBrasil => "Banco_do_Brasil".to_string(),
            Bank::Caixa => "Caixa".to_string(),
            Bank::Nubank => "Nubank".to_string(),
            Bank::Inter => "Inter".to_string(),
            Bank::Sicoob => "Sicoob".to_string(),
            Bank::Sicredi => "Sicredi".to_string(),
            Bank::Safra => "Safra".to_string(),
            Bank::Other(raw) => folder_safe(&title_case(raw)),
        }
    }
}

/// Fallback folder for a bank name with nothing usable in it.
const OTHER_BANK_FOLDER: &str = "Outro_Banco";

/// Make `name` usable as a single path component.
fn folder_safe(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') || c.is_control() { '_' } else { c })
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        OTHER_BANK_FOLDER.to_string()
    } else {
        cleaned
    }
}

/// Document types in declaration order. The order breaks classification ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Bank statement (extrato).
    #[serde(rename = "extrato")]
    Statement,
    /// Transfer / PIX proof of payment (comprovante).
    #[serde(rename = "comprovante")]
    PaymentProof,
    /// Credit or debit card bill (cartão).
    #[serde(rename = "cartao")]
    Card,
    /// Contract (contrato).
    #[serde(rename = "contrato")]
    Contract,
    /// Fiscal invoice (nota fiscal, NF-e).
    #[serde(rename = "nota_fiscal")]
    Invoice,
    /// Timber packing list (romaneio).
    #[serde(rename = "romaneio")]
    TimberManifest,
    /// Freight / transport document (frete).
    #[serde(rename = "frete")]
    Freight,
    /// Bank slip (boleto).
    #[serde(rename = "boleto")]
    Bill,
    /// Receipt (recibo).
    #[serde(rename = "recibo")]
    Receipt,
}

impl DocumentType {
    pub const ALL: [DocumentType; 9] = [
        DocumentType::Statement,
        DocumentType::PaymentProof,
        DocumentType::Card,
        DocumentType::Contract,
        DocumentType::Invoice,
        DocumentType::TimberManifest,
        DocumentType::Freight,
        DocumentType::Bill,
        DocumentType::Receipt,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DocumentType::Statement => "extrato",
            DocumentType::PaymentProof => "comprovante",
            DocumentType::Card => "cartao",
            DocumentType::Contract => "contrato",
            DocumentType::Invoice => "nota_fiscal",
            DocumentType::TimberManifest => "romaneio",
            DocumentType::Freight => "frete",
            DocumentType::Bill => "boleto",
            DocumentType::Receipt => "recibo",
        }
    }

    /// Title-cased key used in file names (e.g. `Nota_Fiscal`).
    pub fn label(&self) -> String {
        title_case(self.key())
    }

    /// Invoices, bills and receipts go to the finance tree.
    pub fn is_financial(&self) -> bool {
        matches!(
            self,
            DocumentType::Invoice | DocumentType::Bill | DocumentType::Receipt
        )
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured attributes extracted from one document.
///
/// This is the contract between extraction and routing. Field aliases accept
/// the Portuguese keys of the legacy JSON format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeBundle {
    /// Valid CPFs found in the text.
    #[serde(alias = "cpfs")]
    pub person_ids: BTreeSet<Identifier>,

    /// Valid CNPJs found in the text.
    #[serde(alias = "cnpjs")]
    pub organization_ids: BTreeSet<Identifier>,

    /// First bank mentioned, by table order.
    #[serde(alias = "banco", skip_serializing_if = "Option::is_none")]
    pub bank: Option<Bank>,

    /// Highest scoring document type.
    #[serde(alias = "tipo_documento", skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,

    /// Distinct dates, sorted by matched text.
    #[serde(alias = "datas")]
    pub dates: Vec<DocumentDate>,

    /// Largest amounts, descending.
    #[serde(alias = "valores")]
    pub amounts: Vec<MonetaryAmount>,

    /// Leading text with newlines collapsed to spaces.
    #[serde(alias = "texto_preview")]
    pub preview: String,
}

impl AttributeBundle {
    pub fn has_person_id(&self) -> bool {
        !self.person_ids.is_empty()
    }

    pub fn has_organization_id(&self) -> bool {
        !self.organization_ids.is_empty()
    }

    pub fn first_date(&self) -> Option<&DocumentDate> {
        self.dates.first()
    }

    pub fn largest_amount(&self) -> Option<&MonetaryAmount> {
        self.amounts.first()
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.person_ids.is_empty()
            && self.organization_ids.is_empty()
            && self.bank.is_none()
            && self.document_type.is_none()
            && self.dates.is_empty()
            && self.amounts.is_empty()
    }
}

fn only_digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
