//! Artifact collection for one class of build output

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::clock::Clock;
use crate::error::{HarvestError, Result};
use crate::filter::ArtifactFilter;
use crate::record::DeployRecord;
use crate::resolver::{split_name, DeployPathResolver};

/// Discovers matching build outputs and copies them into the deploy
/// directory under collision-safe names.
///
/// Each invocation of [`collect`](Self::collect) handles one artifact class
/// and is independent of the others; the deploy directory and clock are the
/// only shared pieces.
pub struct ArtifactCollector {
    resolver: DeployPathResolver,
}

impl ArtifactCollector {
    /// Create a collector placing artifacts into `deploy_dir`
    pub fn new(deploy_dir: PathBuf, clock: Arc<dyn Clock>) -> Self {
        Self { resolver: DeployPathResolver::new(deploy_dir, clock) }
    }

    /// Harvest every file under `root` that matches `filter` and was
    /// modified at or after `reference`.
    ///
    /// Zero matches is not an error; the returned record's counters let the
    /// caller report it. Any enumeration, stat, resolution or copy failure
    /// aborts the whole invocation.
    pub async fn collect(
        &self,
        root: &Path,
        filter: &ArtifactFilter,
        reference: DateTime<Local>,
    ) -> Result<DeployRecord> {
        let files = discover(root, filter)?;

        let mut record = DeployRecord { matched: files.len(), ..Default::default() };

        for file in files {
            let metadata = fs::symlink_metadata(&file)
                .and_then(|metadata| metadata.modified())
                .map_err(|source| HarvestError::Stat { path: file.clone(), source })?;
            let modified: DateTime<Local> = metadata.into();

            if modified < reference {
                warn!("skipping {}: modified before the build started", file.display());
                record.skipped_stale += 1;
                continue;
            }

            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let (base_name, ext) = split_name(&file_name);

            let dest = self.resolver.resolve(base_name, ext).await?;

            info!("copy {} to {}", file.display(), dest.display());
            fs::copy(&file, &dest).map_err(|source| HarvestError::Copy {
                src: file.clone(),
                dest: dest.clone(),
                source,
            })?;

            record.push(dest);
        }

        Ok(record)
    }
}

/// Enumerate files under `root` matching `filter`, in a deterministic
/// depth-first order.
fn discover(root: &Path, filter: &ArtifactFilter) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry
            .map_err(|source| HarvestError::Discovery { root: root.to_path_buf(), source })?;

        if !entry.file_type().is_file() {
            continue;
        }

        if filter.matches(entry.path()) {
            debug!("matched {}", entry.path().display());
            found.push(entry.into_path());
        }
    }

    Ok(found)
}
