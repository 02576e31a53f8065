//! End-to-end handling of one file: text, bundle, destinations, copies.

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::Result;
use crate::extract::DocumentExtractor;
use crate::filing::{Filer, FilingReport};
use crate::models::config::DocrouteConfig;
use crate::models::document::AttributeBundle;
use crate::naming::NameResolver;
use crate::routing::{DestinationSet, RoutingEngine};
use crate::source::{load_document, TextSource};
use crate::stats::DocumentOutcome;

/// Everything decided about one file before anything is written.
#[derive(Debug, Clone)]
pub struct Plan {
    pub bundle: AttributeBundle,
    pub text_extracted: bool,
    pub destinations: DestinationSet,
    pub file_name: String,
}

/// Wires extraction, routing, naming and filing together.
pub struct Organizer {
    extractor: DocumentExtractor,
    engine: RoutingEngine,
    resolver: NameResolver,
    filer: Filer,
}

impl Organizer {
    pub fn new(config: &DocrouteConfig, dry_run: bool) -> Self {
        let resolver = NameResolver::from_config(&config.naming);
        Self {
            extractor: DocumentExtractor::from_config(&config.extraction),
            engine: RoutingEngine::new(config.routing.clone()),
            filer: Filer::new(dry_run).with_resolver(resolver.clone()),
            resolver,
        }
    }

    pub fn engine(&self) -> &RoutingEngine {
        &self.engine
    }

    /// Analyze and route a file without touching the destination tree.
    pub fn plan(&self, source: &dyn TextSource, path: &Path, now: NaiveDateTime) -> Result<Plan> {
        let document = load_document(source, path)?;
        let result = self.extractor.analyze(&document);
        let destinations = self.engine.route_at(&result.bundle, now.date());
        let extension = document.extension();
        let file_name = self
            .resolver
            .canonical_name(&result.bundle, extension.as_deref(), now);

        Ok(Plan {
            bundle: result.bundle,
            text_extracted: result.text_extracted,
            destinations,
            file_name,
        })
    }

    /// Plan, then copy the file into every destination.
    ///
    /// Never fails: problems are recorded in the outcome.
    pub fn organize(&self, source: &dyn TextSource, path: &Path, now: NaiveDateTime) -> DocumentOutcome {
        debug!(path = %path.display(), "organizing");
        let mut outcome = DocumentOutcome::new(path);

        let plan = match self.plan(source, path, now) {
            Ok(plan) => plan,
            Err(e) => {
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };

        outcome.document_type = plan.bundle.document_type;
        outcome.text_extracted = plan.text_extracted;

        if plan.destinations.is_empty() {
            info!(path = %path.display(), "no rule matched, leaving file in place");
            return outcome;
        }

        let report = self.filer.file(path, &plan.destinations, &plan.file_name, now);
        outcome.error = first_failure(&report);
        outcome.placed = report.placed;
        outcome
    }
}

fn first_failure(report: &FilingReport) -> Option<String> {
    report
        .failures
        .first()
        .map(|f| format!("{}: {}", f.destination.display(), f.reason))
}
