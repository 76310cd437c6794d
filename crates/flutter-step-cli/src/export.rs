//! Publishing results to the calling system via envman

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::StepError;

/// Seam for publishing a key/value pair to the calling system's environment
#[async_trait]
pub trait Exporter: Send + Sync {
    async fn export(&self, key: &str, value: &str) -> Result<(), StepError>;
}

/// Exports via `envman add --key <KEY>` with the value piped to stdin
pub struct EnvmanExporter;

#[async_trait]
impl Exporter for EnvmanExporter {
    async fn export(&self, key: &str, value: &str) -> Result<(), StepError> {
        debug!("envman add --key {key}");

        let mut child = Command::new("envman")
            .args(["add", "--key", key])
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| StepError::Export { key: key.to_string(), reason: e.to_string() })?;

        // The value goes through stdin so it is never shell-interpreted.
        let mut stdin = child.stdin.take().ok_or_else(|| StepError::Export {
            key: key.to_string(),
            reason: "could not open envman stdin".to_string(),
        })?;
        stdin
            .write_all(value.as_bytes())
            .await
            .map_err(|e| StepError::Export { key: key.to_string(), reason: e.to_string() })?;
        drop(stdin);

        let status = child
            .wait()
            .await
            .map_err(|e| StepError::Export { key: key.to_string(), reason: e.to_string() })?;

        if !status.success() {
            return Err(StepError::Export {
                key: key.to_string(),
                reason: format!("envman exited with {status}"),
            });
        }

        Ok(())
    }
}
