//! Collected outcome of a discovery pass.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::Classification;

/// A module accepted by a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedModule {
    pub path: PathBuf,
    pub reloadable: bool,
}

/// Everything one pass reported, in callback order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    /// Resolved directories, in configuration order.
    pub search_paths: Vec<PathBuf>,
    pub matched: Vec<MatchedModule>,
    pub excluded: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl DiscoveryReport {
    /// How `path` was classified, if the pass saw it.
    pub fn classification_of(&self, path: &Path) -> Option<Classification> {
        if let Some(m) = self.matched.iter().find(|m| m.path == path) {
            return Some(Classification::Matched {
                reloadable: m.reloadable,
            });
        }
        if self.excluded.iter().any(|p| p == path) {
            return Some(Classification::Excluded);
        }
        self.skipped
            .iter()
            .any(|p| p == path)
            .then_some(Classification::Skipped)
    }

    pub fn reloadable(&self) -> impl Iterator<Item = &MatchedModule> {
        self.matched.iter().filter(|m| m.reloadable)
    }

    /// Whether two passes classified the same files the same way, ignoring
    /// enumeration order.
    pub fn is_equivalent(&self, other: &DiscoveryReport) -> bool {
        fn sorted<T: Ord + Clone>(items: &[T]) -> Vec<T> {
            let mut items = items.to_vec();
            items.sort();
            items
        }

        let matched = |r: &DiscoveryReport| {
            sorted(
                &r.matched
                    .iter()
                    .map(|m| (m.path.clone(), m.reloadable))
                    .collect::<Vec<_>>(),
            )
        };

        matched(self) == matched(other)
            && sorted(&self.excluded) == sorted(&other.excluded)
            && sorted(&self.skipped) == sorted(&other.skipped)
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.excluded.is_empty() && self.skipped.is_empty()
    }
}
