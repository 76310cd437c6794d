//! Error types for SDK installation

use thiserror::Error;

/// SDK-specific error types
#[derive(Error, Debug)]
pub enum SdkError {
    /// The host OS has no Flutter release archives
    #[error("Unsupported OS: {os}")]
    UnsupportedOs { os: String },

    /// The SDK destination directory could not be determined
    #[error("Could not determine SDK destination directory: {reason}")]
    Destination { reason: String },

    /// Downloading the release archive failed
    #[error("Failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Extracting the release archive failed
    #[error("Failed to extract SDK archive: {reason}")]
    Extract { reason: String },

    /// The Android SDK location is not configured on the host
    #[error("Android SDK is not configured (set ANDROID_HOME or ANDROID_SDK_ROOT)")]
    AndroidSdkNotConfigured,

    /// A required host tool is not on PATH
    #[error("Required tool not found on PATH: {tool}")]
    MissingTool { tool: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
