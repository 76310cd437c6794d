//! Error types for artifact harvesting

use std::path::PathBuf;

use thiserror::Error;

/// Harvest-specific error types
#[derive(Error, Debug)]
pub enum HarvestError {
    /// File enumeration under the root directory failed
    #[error("Failed to search for artifacts under {root:?}: {source}")]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Could not read a matched file's metadata
    #[error("Failed to get file info for {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No free deploy path was found within the retry budget
    #[error(
        "Failed to find a free deploy path for {base_name}{ext} after {attempts} attempts: {last_error}"
    )]
    ResolutionExhausted {
        base_name: String,
        ext: String,
        attempts: u32,
        last_error: String,
    },

    /// Byte copy into the deploy directory failed
    #[error("Failed to copy {src:?} to {dest:?}: {source}")]
    Copy {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An include or exclude pattern did not compile
    #[error("Invalid filter pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;
