//! Canonical output file names and collision handling.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::NamingError;
use crate::models::config::NamingConfig;
use crate::models::document::AttributeBundle;

/// Label used when the document type is unknown.
pub const UNKNOWN_LABEL: &str = "Documento";

const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Builds canonical names and finds a free slot for them.
#[derive(Debug, Clone)]
pub struct NameResolver {
    default_extension: String,
}

impl NameResolver {
    pub fn new() -> Self {
        Self::from_config(&NamingConfig::default())
    }

    pub fn from_config(config: &NamingConfig) -> Self {
        Self {
            default_extension: config.default_extension.clone(),
        }
    }

    /// `{year}-{MM}-{DD}_{label}[_{bank}][_R${amount}].{ext}`
    ///
    /// The year comes from the first document date when there is one. Month
    /// and day always come from `now`, as existing archives were built that way.
    pub fn canonical_name(
        &self,
        bundle: &AttributeBundle,
        extension: Option<&str>,
        now: NaiveDateTime,
    ) -> String {
        let year = bundle
            .first_date()
            .map(|d| d.year().to_string())
            .unwrap_or_else(|| now.year().to_string());

        let mut name = format!("{}-{}", year, now.format("%m-%d"));

        name.push('_');
        match bundle.document_type {
            Some(t) => name.push_str(&t.label()),
            None => name.push_str(UNKNOWN_LABEL),
        }

        if let Some(bank) = &bundle.bank {
            name.push('_');
            name.push_str(&bank.display_name());
        }

        if let Some(amount) = bundle.largest_amount() {
            name.push('_');
            name.push_str(&amount.file_label());
        }

        let extension = extension
            .map(|e| e.trim_start_matches('.'))
            .filter(|e| !e.is_empty())
            .unwrap_or(self.default_extension.as_str());

        sanitize(&format!("{}.{}", name, extension.to_lowercase()))
    }

    /// Pick a free path for `name` in `dir`.
    ///
    /// When `name` is taken, one retry is made with the time of `now` appended
    /// to the stem. A second collision is an error; nothing is ever overwritten.
    pub fn resolve(
        &self,
        dir: &Path,
        name: &str,
        now: NaiveDateTime,
        exists: impl Fn(&Path) -> bool,
    ) -> Result<PathBuf, NamingError> {
        let candidate = dir.join(name);
        if !exists(&candidate) {
            return Ok(candidate);
        }

        let retry = dir.join(with_time_suffix(name, now));
        debug!(
            taken = %candidate.display(),
            retry = %retry.display(),
            "name taken, retrying with time suffix"
        );

        if exists(&retry) {
            warn!(path = %retry.display(), "name collision persists");
            return Err(NamingError::Collision { path: retry });
        }

        Ok(retry)
    }

    /// [`resolve`](Self::resolve) against the real file system.
    pub fn resolve_on_disk(
        &self,
        dir: &Path,
        name: &str,
        now: NaiveDateTime,
    ) -> Result<PathBuf, NamingError> {
        self.resolve(dir, name, now, |p| p.exists())
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace characters that are invalid in file names with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if FORBIDDEN_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

fn with_time_suffix(name: &str, now: NaiveDateTime) -> String {
    let suffix = now.format("%H%M%S");
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", name, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{Bank, DocumentDate, DocumentType, MonetaryAmount};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::collections::HashSet;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    fn statement_bundle() -> AttributeBundle {
        AttributeBundle {
            bank: Some(Bank::Itau),
            document_type: Some(DocumentType::Statement),
            dates: vec![DocumentDate::parse("15/03/2024").unwrap()],
            amounts: vec![MonetaryAmount::new(Decimal::new(123456, 2), "R$ 1.234,56")],
            ..Default::default()
        }
    }

    #[test]
    fn test_canonical_name_full() {
        let name = NameResolver::new().canonical_name(&statement_bundle(), Some("pdf"), now());
        assert_eq!(name, "2024-06-09_Extrato_Itau_R$1234,56.pdf");
    }

    #[test]
    fn test_canonical_name_minimal() {
        let name = NameResolver::new().canonical_name(&AttributeBundle::default(), None, now());
        assert_eq!(name, "2025-06-09_Documento.pdf");
    }

    #[test]
    fn test_canonical_name_multiword_label_and_bank() {
        let bundle = AttributeBundle {
            bank: Some(Bank::BancoDoBrasil),
            document_type: Some(DocumentType::Invoice),
            ..Default::default()
        };
        let name = NameResolver::new().canonical_name(&bundle, Some(".TXT"), now());
        assert_eq!(name, "2025-06-09_Nota_Fiscal_Banco_do_Brasil.txt");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("a<b>c:d\"e/f\\g|h?i*j"), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize("tab\there"), "tab_here");
        assert_eq!(sanitize("R$1234,56"), "R$1234,56");
    }

    #[test]
    fn test_other_bank_name_is_sanitized() {
        let bundle = AttributeBundle {
            bank: Some(Bank::Other("caixa/rural".to_string())),
            ..Default::default()
        };
        let name = NameResolver::new().canonical_name(&bundle, None, now());
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_resolve_free_name() {
        let path = NameResolver::new()
            .resolve(Path::new("/out"), "a.pdf", now(), |_| false)
            .unwrap();
        assert_eq!(path, PathBuf::from("/out/a.pdf"));
    }

    #[test]
    fn test_resolve_retries_with_time_suffix() {
        let taken: HashSet<PathBuf> = [PathBuf::from("/out/a.pdf")].into();
        let path = NameResolver::new()
            .resolve(Path::new("/out"), "a.pdf", now(), |p| taken.contains(p))
            .unwrap();
        assert_eq!(path, PathBuf::from("/out/a_140507.pdf"));
    }

    #[test]
    fn test_resolve_surfaces_second_collision() {
        let result = NameResolver::new().resolve(Path::new("/out"), "a.pdf", now(), |_| true);
        match result {
            Err(NamingError::Collision { path }) => {
                assert_eq!(path, PathBuf::from("/out/a_140507.pdf"))
            }
            other => panic!("expected collision, got {:?}", other),
        }
    }

    #[test]
    fn test_time_suffix_without_extension() {
        assert_eq!(with_time_suffix("LEIAME", now()), "LEIAME_140507");
        assert_eq!(with_time_suffix(".hidden", now()), ".hidden_140507");
    }

    #[test]
    fn test_resolve_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = NameResolver::new();

        let first = resolver.resolve_on_disk(dir.path(), "x.pdf", now()).unwrap();
        assert_eq!(first, dir.path().join("x.pdf"));

        std::fs::write(&first, b"1").unwrap();
        let second = resolver.resolve_on_disk(dir.path(), "x.pdf", now()).unwrap();
        assert_eq!(second, dir.path().join("x_140507.pdf"));

        std::fs::write(&second, b"2").unwrap();
        assert!(resolver.resolve_on_disk(dir.path(), "x.pdf", now()).is_err());
    }
}
