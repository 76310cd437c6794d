//! Collision-safe deploy path resolution
//!
//! Artifacts built in different configurations may legitimately share a base
//! name, so a colliding destination is retried under a timestamp-qualified
//! name instead of failing outright. The retry budget bounds the loop when
//! the deploy directory keeps colliding.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::clock::Clock;
use crate::error::{HarvestError, Result};

/// Total number of destination names tried before giving up
pub const MAX_ATTEMPTS: u32 = 10;

/// Wait between attempts
pub const RETRY_WAIT: Duration = Duration::from_secs(1);

/// Disambiguation suffix format, second granularity
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Picks a non-colliding destination path inside a fixed deploy directory
pub struct DeployPathResolver {
    deploy_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl DeployPathResolver {
    /// Create a resolver for `deploy_dir`
    pub fn new(deploy_dir: PathBuf, clock: Arc<dyn Clock>) -> Self {
        Self { deploy_dir, clock }
    }

    /// Compute a destination path for `base_name` + `ext` that does not
    /// exist yet.
    ///
    /// The first candidate is `base_name + ext`; each retry recomputes the
    /// candidate as `base_name + <timestamp> + ext` from the clock, so two
    /// retries a second apart yield different names. The resolver only
    /// checks existence; creating the file is the caller's job.
    pub async fn resolve(&self, base_name: &str, ext: &str) -> Result<PathBuf> {
        let mut candidate = format!("{base_name}{ext}");
        let mut last_error = String::new();

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                warn!("  Retrying ({}/{})...", attempt + 1, MAX_ATTEMPTS);
            }

            let path = self.deploy_dir.join(&candidate);
            match path.try_exists() {
                Ok(false) => return Ok(path),
                Ok(true) => {
                    last_error = format!("file already exists at {}", path.display());
                    warn!("  Attempt {} failed: {last_error}", attempt + 1);
                }
                Err(source) => {
                    last_error = format!("failed to check {}: {source}", path.display());
                    warn!("  Attempt {} failed: {last_error}", attempt + 1);
                }
            }

            // Wait only between attempts; the timestamp is recomputed each
            // time so consecutive retries get different names.
            if attempt + 1 < MAX_ATTEMPTS {
                self.clock.sleep(RETRY_WAIT).await;
                candidate = format!(
                    "{base_name}{}{ext}",
                    self.clock.now().format(TIMESTAMP_FORMAT)
                );
            }
        }

        Err(HarvestError::ResolutionExhausted {
            base_name: base_name.to_string(),
            ext: ext.to_string(),
            attempts: MAX_ATTEMPTS,
            last_error,
        })
    }
}

/// Split a file name into base name and extension, keeping the dot with the
/// extension (`app-debug.apk` -> `("app-debug", ".apk")`). A name whose only
/// dot is leading, or that has no dot at all, is all base name.
pub fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    }
}
