//! Error types for the docroute-core library.
//!
//! Extraction, classification and routing are total and never fail; only
//! the collaborators around them (text sources, naming on disk, filing,
//! configuration) return these errors.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the docroute library.
#[derive(Error, Debug)]
pub enum DocrouteError {
    /// Text extraction error.
    #[error("text extraction error: {0}")]
    Text(#[from] TextError),
}

/// Errors raised by text sources.
#[derive(Error, Debug)]
pub enum TextError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    Extraction(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// No text source handles this file type.
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    /// I/O error while reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while placing a canonical name in a destination.
#[derive(Error, Debug)]
pub enum NamingError {
    /// Both the canonical name and its time-suffixed retry are taken.
    #[error("name collision persists after retry: {}", path.display())]
    Collision { path: PathBuf },
}

/// Errors raised while copying a document into one destination.
#[derive(Error, Debug)]
pub enum FilingError {
    /// The destination directory could not be created.
    #[error("cannot create {}: {}", path.display(), source)]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No free name was found in the destination.
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// The copy itself failed, including a target that appeared meanwhile.
    #[error("copy to {} failed: {}", path.display(), source)]
    Copy {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for this schema.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value violates a configuration invariant.
    #[error("invalid value: {0}")]
    Invalid(String),
}

/// Result type for the docroute library.
pub type Result<T> = std::result::Result<T, DocrouteError>;
