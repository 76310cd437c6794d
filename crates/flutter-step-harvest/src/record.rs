//! Result of one collector invocation

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Accumulated outcome of harvesting one artifact class
///
/// Destinations are recorded in discovery order; `last` always points at the
/// most recently copied one. `matched` and `skipped_stale` let the caller
/// distinguish "nothing matched the filters" from "only stale artifacts were
/// present".
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeployRecord {
    /// Destination paths in discovery order
    pub deployed: Vec<PathBuf>,
    /// The most recently copied destination
    pub last: Option<PathBuf>,
    /// Number of files that matched the filters
    pub matched: usize,
    /// Matches skipped because they predate the build
    pub skipped_stale: usize,
}

impl DeployRecord {
    /// Record a copied destination and mark it as the latest
    pub fn push(&mut self, dest: PathBuf) {
        self.last = Some(dest.clone());
        self.deployed.push(dest);
    }

    /// True when nothing was copied
    pub fn is_empty(&self) -> bool {
        self.deployed.is_empty()
    }

    /// True when files matched but every one of them was stale
    pub fn only_stale(&self) -> bool {
        self.deployed.is_empty() && self.matched > 0 && self.skipped_stale == self.matched
    }

    /// Last destination as a path, if anything was copied
    pub fn last_path(&self) -> Option<&Path> {
        self.last.as_deref()
    }
}
