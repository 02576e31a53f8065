//! Data models and configuration.

pub mod config;
pub mod document;

pub use config::{DocrouteConfig, ExtractionConfig, NamingConfig, RoutingConfig};
pub use document::{
    AttributeBundle, Bank, DateFormat, DocumentDate, DocumentType, IdKind, Identifier,
    MonetaryAmount, RawDocument,
};
