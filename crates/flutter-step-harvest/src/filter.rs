//! Include/exclude path filters for one artifact class
//!
//! Patterns use glob syntax where `*` crosses directory separators, matching
//! the behavior of `find -path` that the step inputs were written for.

use std::path::Path;

use globset::{Glob, GlobMatcher};

use crate::error::{HarvestError, Result};

/// Compiled filter pair selecting the files of one artifact class
#[derive(Debug, Clone)]
pub struct ArtifactFilter {
    include: GlobMatcher,
    excludes: Vec<GlobMatcher>,
}

impl ArtifactFilter {
    /// Build a filter from one include pattern and a newline-delimited set
    /// of exclude patterns. Blank exclude lines are dropped.
    pub fn new(include: &str, excludes: &str) -> Result<Self> {
        let patterns: Vec<&str> = excludes
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_patterns(include, &patterns)
    }

    /// Build a filter from already-split pattern lists
    pub fn from_patterns(include: &str, excludes: &[&str]) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            excludes: excludes
                .iter()
                .map(|pattern| compile(pattern))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    /// Check whether `path` belongs to this artifact class
    pub fn matches(&self, path: &Path) -> bool {
        self.include.is_match(path) && !self.excludes.iter().any(|glob| glob.is_match(path))
    }
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|source| HarvestError::Pattern { pattern: pattern.to_string(), source })
}
