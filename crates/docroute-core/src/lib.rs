//! Core library for Brazilian financial document routing.
//!
//! This crate provides:
//! - CPF/CNPJ checksum validation and entity extraction (dates, BRL amounts, banks)
//! - Keyword-based document type classification
//! - Rule-based fan-out of documents to a filing taxonomy
//! - Canonical file naming with collision handling
//! - Copy-based filing and per-run statistics

pub mod error;
pub mod extract;
pub mod filing;
pub mod models;
pub mod naming;
pub mod organize;
pub mod routing;
pub mod source;
pub mod stats;

pub use error::{ConfigError, DocrouteError, FilingError, NamingError, Result, TextError};
pub use extract::{classify, DocumentClassifier, DocumentExtractor, DocumentReport, ExtractionResult};
pub use filing::{Filer, FilingFailure, FilingReport};
pub use models::{
    AttributeBundle, Bank, DocrouteConfig, DocumentDate, DocumentType, Identifier, MonetaryAmount,
    RawDocument, RoutingConfig,
};
pub use naming::NameResolver;
pub use organize::{Organizer, Plan};
pub use routing::{DestinationRule, DestinationSet, RoutingContext, RoutingEngine};
pub use source::{load_document, FileTextSource, TextSource};
pub use stats::{DocumentOutcome, RunStats};
