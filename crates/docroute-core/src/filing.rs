//! Copies a source document into every routed destination.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::FilingError;
use crate::naming::NameResolver;
use crate::routing::DestinationSet;

/// A destination that could not receive the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingFailure {
    pub destination: PathBuf,
    pub reason: String,
}

/// Outcome of filing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilingReport {
    /// Final paths written (or that would be written in a dry run).
    pub placed: Vec<PathBuf>,
    /// Destinations that failed.
    pub failures: Vec<FilingFailure>,
}

impl FilingReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.placed.is_empty()
    }
}

/// Places copies of a document under its destinations.
///
/// The source is never moved or modified. Each destination is handled on its
/// own, so one failing directory does not stop the others.
#[derive(Debug, Clone, Default)]
pub struct Filer {
    dry_run: bool,
    resolver: NameResolver,
}

impl Filer {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            resolver: NameResolver::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: NameResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn file(
        &self,
        source: &Path,
        destinations: &DestinationSet,
        name: &str,
        now: NaiveDateTime,
    ) -> FilingReport {
        let mut report = FilingReport::default();

        for dir in destinations {
            match self.place(source, dir, name, now) {
                Ok(path) => {
                    info!(
                        dry_run = self.dry_run,
                        "{} -> {}",
                        source.display(),
                        path.display()
                    );
                    report.placed.push(path);
                }
                Err(e) => {
                    warn!(destination = %dir.display(), error = %e, "filing failed");
                    report.failures.push(FilingFailure {
                        destination: dir.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    fn place(
        &self,
        source: &Path,
        dir: &Path,
        name: &str,
        now: NaiveDateTime,
    ) -> Result<PathBuf, FilingError> {
        if !self.dry_run {
            fs::create_dir_all(dir).map_err(|e| FilingError::CreateDir {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let target = self.resolver.resolve_on_disk(dir, name, now)?;

        if !self.dry_run {
            copy_new(source, &target).map_err(|e| FilingError::Copy {
                path: target.clone(),
                source: e,
            })?;
            debug!(target = %target.display(), "copied");
        }

        Ok(target)
    }
}

/// Copy `source` to a `target` that must not exist yet.
fn copy_new(source: &Path, target: &Path) -> io::Result<u64> {
    let mut reader = File::open(source)?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(target)?;
    io::copy(&mut reader, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn source_in(dir: &Path) -> PathBuf {
        let source = dir.join("entrada.pdf");
        fs::write(&source, b"%PDF-1.4 fake").unwrap();
        source
    }

    #[test]
    fn test_copies_into_every_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source_in(tmp.path());
        let destinations: DestinationSet = vec![tmp.path().join("a/b"), tmp.path().join("c")]
            .into_iter()
            .collect();

        let report = Filer::new(false).file(&source, &destinations, "doc.pdf", now());

        assert!(report.is_success());
        assert_eq!(report.placed.len(), 2);
        for path in &report.placed {
            assert_eq!(fs::read(path).unwrap(), b"%PDF-1.4 fake");
        }
        assert!(source.exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source_in(tmp.path());
        let destinations: DestinationSet = vec![tmp.path().join("novo")].into_iter().collect();

        let report = Filer::new(true).file(&source, &destinations, "doc.pdf", now());

        assert_eq!(report.placed, vec![tmp.path().join("novo").join("doc.pdf")]);
        assert!(!tmp.path().join("novo").exists());
    }

    #[test]
    fn test_existing_name_gets_time_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source_in(tmp.path());
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("doc.pdf"), b"older").unwrap();

        let destinations: DestinationSet = vec![dest.clone()].into_iter().collect();
        let report = Filer::new(false).file(&source, &destinations, "doc.pdf", now());

        assert_eq!(report.placed, vec![dest.join("doc_093000.pdf")]);
        assert_eq!(fs::read(dest.join("doc.pdf")).unwrap(), b"older");
    }

    #[test]
    fn test_collision_after_retry_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source_in(tmp.path());
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("doc.pdf"), b"1").unwrap();
        fs::write(dest.join("doc_093000.pdf"), b"2").unwrap();

        let destinations: DestinationSet = vec![dest.clone()].into_iter().collect();
        let report = Filer::new(false).file(&source, &destinations, "doc.pdf", now());

        assert!(report.placed.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].destination, dest);
        assert_eq!(fs::read(dest.join("doc_093000.pdf")).unwrap(), b"2");
    }

    #[test]
    fn test_copy_never_truncates_an_existing_target() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source_in(tmp.path());
        let target = tmp.path().join("doc.pdf");
        fs::write(&target, b"older").unwrap();

        let err = copy_new(&source, &target).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&target).unwrap(), b"older");
    }

    #[test]
    fn test_failure_reason_names_the_collision() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source_in(tmp.path());
        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("doc.pdf"), b"1").unwrap();
        fs::write(dest.join("doc_093000.pdf"), b"2").unwrap();

        let destinations: DestinationSet = vec![dest.clone()].into_iter().collect();
        let report = Filer::new(false).file(&source, &destinations, "doc.pdf", now());

        assert!(report.failures[0]
            .reason
            .starts_with("name collision persists after retry"));
    }

    #[test]
    fn test_one_failing_destination_does_not_abort_others() {
        let tmp = tempfile::tempdir().unwrap();
        let source = source_in(tmp.path());
        // A regular file where a directory is expected
        let blocker = tmp.path().join("bloqueado");
        fs::write(&blocker, b"").unwrap();

        let destinations: DestinationSet = vec![blocker.join("sub"), tmp.path().join("livre")]
            .into_iter()
            .collect();
        let report = Filer::new(false).file(&source, &destinations, "doc.pdf", now());

        assert_eq!(report.placed, vec![tmp.path().join("livre").join("doc.pdf")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].destination, blocker.join("sub"));
    }
}
