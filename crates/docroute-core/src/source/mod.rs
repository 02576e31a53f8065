//! Text sources: turn a file on disk into a [`RawDocument`].

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "pdf")]
pub use pdf::PdfTextExtractor;

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::TextError;
use crate::models::document::RawDocument;

/// Produces the plain text of a document.
pub trait TextSource {
    fn extract_text(&self, path: &Path) -> Result<String, TextError>;
}

/// Dispatches on file extension.
///
/// `.pdf` goes through [`PdfTextExtractor`] when the `pdf` feature is on;
/// `.txt` and `.md` are read as UTF-8, replacing invalid sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextSource;

impl FileTextSource {
    pub fn new() -> Self {
        Self
    }

    /// Extensions this source accepts.
    pub fn supported_extensions() -> &'static [&'static str] {
        if cfg!(feature = "pdf") {
            &["pdf", "txt", "md"]
        } else {
            &["txt", "md"]
        }
    }

    #[cfg(feature = "pdf")]
    fn extract_pdf(&self, path: &Path) -> Result<String, TextError> {
        let data = fs::read(path)?;
        let mut extractor = PdfTextExtractor::new();
        extractor.load(&data)?;
        extractor.extract_text()
    }

    #[cfg(not(feature = "pdf"))]
    fn extract_pdf(&self, _path: &Path) -> Result<String, TextError> {
        Err(TextError::Unsupported("pdf (built without the pdf feature)".to_string()))
    }
}

impl TextSource for FileTextSource {
    fn extract_text(&self, path: &Path) -> Result<String, TextError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        debug!(path = %path.display(), %extension, "extracting text");

        match extension.as_str() {
            "pdf" => self.extract_pdf(path),
            "txt" | "md" => {
                let bytes = fs::read(path)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            other => Err(TextError::Unsupported(other.to_string())),
        }
    }
}

/// Read a file into a [`RawDocument`].
///
/// Extraction failures yield a document with empty text: downstream, an
/// empty document is a valid input that simply produces an empty bundle.
/// Only a missing or unreadable file is an error.
pub fn load_document(source: &dyn TextSource, path: &Path) -> Result<RawDocument, TextError> {
    let metadata = fs::metadata(path)?;
    let modified = metadata
        .modified()
        .map(|t| DateTime::<Local>::from(t).naive_local())
        .unwrap_or_else(|_| NaiveDateTime::default());

    let text = match source.extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "text extraction failed, continuing with empty text");
            String::new()
        }
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(RawDocument::new(text, file_name, metadata.len(), modified))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extrato.txt");
        fs::write(&path, "Extrato Itaú").unwrap();

        let text = FileTextSource::new().extract_text(&path).unwrap();
        assert_eq!(text, "Extrato Itaú");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.md");
        fs::write(&path, b"Per\xedodo").unwrap();

        let text = FileTextSource::new().extract_text(&path).unwrap();
        assert_eq!(text, "Per\u{FFFD}odo");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foto.jpg");
        fs::write(&path, b"\xff\xd8").unwrap();

        assert!(matches!(
            FileTextSource::new().extract_text(&path),
            Err(TextError::Unsupported(ext)) if ext == "jpg"
        ));
    }

    #[test]
    fn test_load_document_degrades_to_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.jpg");
        fs::write(&path, b"0123456789").unwrap();

        let document = load_document(&FileTextSource::new(), &path).unwrap();
        assert_eq!(document.file_name, "scan.jpg");
        assert_eq!(document.file_size, 10);
        assert!(!document.has_text());
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_broken_pdf_degrades_to_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quebrado.pdf");
        fs::write(&path, b"%PDF-1.4 truncated").unwrap();

        let document = load_document(&FileTextSource::new(), &path).unwrap();
        assert!(!document.has_text());
    }

    #[test]
    fn test_load_document_missing_file() {
        let result = load_document(&FileTextSource::new(), Path::new("/nonexistent/x.txt"));
        assert!(matches!(result, Err(TextError::Io(_))));
    }
}
