//! Step-level errors and their process exit codes

use std::process::ExitStatus;

use flutter_step_harvest::HarvestError;
use flutter_step_sdk::SdkError;
use thiserror::Error;

/// Errors that abort the step
#[derive(Error, Debug)]
pub enum StepError {
    /// SDK installation or host environment failure
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// Artifact harvesting failure
    #[error(transparent)]
    Harvest(#[from] HarvestError),

    /// A Flutter command could not be started
    #[error("Failed to run Flutter command {command:?}: {source}")]
    BuildSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A Flutter command exited with a nonzero status
    #[error("Flutter invocation failed: {command:?} ({status})")]
    BuildCommand { command: String, status: ExitStatus },

    /// Publishing a key/value pair via envman failed
    #[error("Failed to export environment ({key}): {reason}")]
    Export { key: String, reason: String },
}

/// Exit code reserved for configuration errors, mapped in `main`
pub const CONFIG_EXIT_CODE: i32 = 7;

impl StepError {
    /// Stable exit code per failure category, so the calling system can
    /// distinguish failure classes.
    pub fn exit_code(&self) -> i32 {
        match self {
            StepError::Sdk(sdk) => match sdk {
                SdkError::AndroidSdkNotConfigured | SdkError::MissingTool { .. } => 6,
                SdkError::Destination { .. } => 5,
                SdkError::UnsupportedOs { .. }
                | SdkError::Download { .. }
                | SdkError::Extract { .. }
                | SdkError::Io(_) => 2,
            },
            StepError::BuildSpawn { .. } | StepError::BuildCommand { .. } => 3,
            StepError::Harvest(harvest) => match harvest {
                HarvestError::Discovery { .. } => 10,
                HarvestError::Stat { .. } => 11,
                HarvestError::ResolutionExhausted { .. } => 12,
                HarvestError::Copy { .. } => 13,
                HarvestError::Pattern { .. } => CONFIG_EXIT_CODE,
            },
            StepError::Export { .. } => 14,
        }
    }
}
