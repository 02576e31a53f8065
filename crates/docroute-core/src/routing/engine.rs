//! Applies the rule table to a bundle.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::models::config::RoutingConfig;
use crate::models::document::AttributeBundle;

use super::rules::{default_rules, DestinationRule, RoutingContext};
use super::DestinationSet;

/// Maps attribute bundles to destination directories.
///
/// Routing never fails: a bundle that matches no rule yields an empty set.
#[derive(Debug, Clone)]
pub struct RoutingEngine {
    config: RoutingConfig,
    rules: Vec<DestinationRule>,
}

impl RoutingEngine {
    /// Engine with the default rule table.
    pub fn new(config: RoutingConfig) -> Self {
        Self::with_rules(config, default_rules())
    }

    /// Engine with a custom rule table.
    pub fn with_rules(config: RoutingConfig, rules: Vec<DestinationRule>) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn rules(&self) -> &[DestinationRule] {
        &self.rules
    }

    /// Route using today's local date for date fallbacks.
    pub fn route(&self, bundle: &AttributeBundle) -> DestinationSet {
        self.route_at(bundle, Local::now().date_naive())
    }

    /// Route with an explicit processing date.
    pub fn route_at(&self, bundle: &AttributeBundle, today: NaiveDate) -> DestinationSet {
        let destinations: DestinationSet = self
            .route_explained(bundle, today)
            .into_iter()
            .map(|(_, path)| path)
            .collect();

        info!("Routed to {} destination(s)", destinations.len());
        destinations
    }

    /// Every matching rule with the directory it produced, in table order.
    ///
    /// Unlike [`route_at`](Self::route_at) this keeps duplicates.
    pub fn route_explained(
        &self,
        bundle: &AttributeBundle,
        today: NaiveDate,
    ) -> Vec<(&'static str, PathBuf)> {
        let ctx = RoutingContext::new(bundle, &self.config, today);

        self.rules
            .iter()
            .filter_map(|rule| {
                let path = rule.evaluate(&ctx)?;
                debug!(rule = rule.name, path = %path.display(), "rule matched");
                Some((rule.name, path))
            })
            .collect()
    }
}

impl Default for RoutingEngine {
    fn default() -> Self {
        Self::new(RoutingConfig::default())
    }
}
