//! Flutter SDK acquisition for the build step
//!
//! Thin I/O wrappers around the release-archive download, per-OS extraction
//! and the host environment checks that must pass before a build can run.

pub mod error;
pub mod host;
pub mod install;
pub mod platform;

pub use error::{Result, SdkError};
pub use host::{ensure_android_sdk, ensure_host_tools};
pub use install::{archive_url, ensure_sdk, ensure_sdk_at, sdk_destination_dir};
pub use platform::Platform;
