//! Host environment checks
//!
//! The step does not install the Android SDK or the tools it shells out to;
//! it only verifies they are present before the build starts.

use std::path::PathBuf;

use tracing::debug;
use which::which;

use crate::error::{Result, SdkError};
use crate::platform::Platform;

/// Verify that the Android SDK location is configured
pub fn ensure_android_sdk() -> Result<()> {
    for var in ["ANDROID_HOME", "ANDROID_SDK_ROOT"] {
        if std::env::var(var).map(|value| !value.is_empty()).unwrap_or(false) {
            debug!("Android SDK configured via {var}");
            return Ok(());
        }
    }

    Err(SdkError::AndroidSdkNotConfigured)
}

/// Verify that every tool the step shells out to is on PATH
pub fn ensure_host_tools(platform: Platform) -> Result<()> {
    ensure_tools_with(platform, |tool| which(tool).ok())
}

fn ensure_tools_with(
    platform: Platform,
    locate: impl Fn(&str) -> Option<PathBuf>,
) -> Result<()> {
    let extractor = match platform {
        Platform::MacOs => "unzip",
        Platform::Linux => "tar",
    };

    for tool in ["bash", "envman", extractor] {
        match locate(tool) {
            Some(path) => debug!("found {tool} -> {}", path.display()),
            None => return Err(SdkError::MissingTool { tool: tool.to_string() }),
        }
    }

    Ok(())
}
