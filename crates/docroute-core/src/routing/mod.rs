//! Rule-based fan-out of an attribute bundle to destination directories.
//!
//! Every rule whose predicate holds contributes one directory; the results
//! are collected into a [`DestinationSet`], so a document may be filed in
//! several places at once.

mod engine;
pub mod rules;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use engine::RoutingEngine;
pub use rules::{default_rules, month_name, DestinationRule, RoutingContext, MONTH_NAMES};

/// Deduplicated destination directories, ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DestinationSet(BTreeSet<PathBuf>);

impl DestinationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory. Returns false if an equal path was already present.
    pub fn insert(&mut self, path: impl AsRef<Path>) -> bool {
        let normalized: PathBuf = path.as_ref().components().collect();
        self.0.insert(normalized)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        let normalized: PathBuf = path.as_ref().components().collect();
        self.0.contains(&normalized)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.iter()
    }
}

impl IntoIterator for DestinationSet {
    type Item = PathBuf;
    type IntoIter = std::collections::btree_set::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DestinationSet {
    type Item = &'a PathBuf;
    type IntoIter = std::collections::btree_set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<PathBuf> for DestinationSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut set = Self::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}
