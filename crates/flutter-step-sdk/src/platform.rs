//! Host platform detection for release archive selection

use serde::Serialize;

use crate::error::{Result, SdkError};

/// Platforms Flutter publishes release archives for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the host platform
    pub fn detect() -> Result<Self> {
        match std::env::consts::OS {
            "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(SdkError::UnsupportedOs { os: other.to_string() }),
        }
    }

    /// Platform segment of the release archive URL
    pub fn release_segment(&self) -> &'static str {
        match self {
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
        }
    }

    /// Archive extension Flutter publishes for this platform
    pub fn archive_ext(&self) -> &'static str {
        match self {
            Platform::MacOs => "zip",
            Platform::Linux => "tar.xz",
        }
    }
}
