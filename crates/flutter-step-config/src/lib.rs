//! Configuration for the Flutter build step
//!
//! Step inputs arrive as environment variables (Bitrise step convention).
//! This crate parses them, expands `$VAR` references in paths, validates the
//! working and deploy directories, and normalizes the include/exclude filter
//! strings into compiled [`ArtifactFilter`] values at the boundary.

use std::path::PathBuf;

use flutter_step_harvest::{ArtifactFilter, HarvestError};
use regex::Regex;
use thiserror::Error;
use tracing::info;

/// Default include filter for APK artifacts
pub const DEFAULT_APK_INCLUDE: &str = "*.apk";
/// Default exclude filters for APK artifacts
pub const DEFAULT_APK_EXCLUDE: &str = "*unaligned.apk\n*Test*.apk";
/// Default include filter for test APK artifacts
pub const DEFAULT_TEST_APK_INCLUDE: &str = "*Test*.apk";
/// Default include filter for ProGuard mapping files
pub const DEFAULT_MAPPING_INCLUDE: &str = "*/mapping.txt";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required step input is absent or empty
    #[error("Required input is missing: {name}")]
    MissingInput { name: String },

    /// The deploy directory input is absent
    #[error("BITRISE_DEPLOY_DIR is not set")]
    MissingDeployDir,

    /// The deploy directory is not an absolute path
    #[error("Deploy directory must be an absolute path, got {path:?}")]
    RelativeDeployDir { path: PathBuf },

    /// The working directory does not exist or is not a directory
    #[error("Working directory is not a directory: {path:?}")]
    InvalidWorkingDir { path: PathBuf },

    /// The command list contains no non-empty entries
    #[error("No Flutter commands configured")]
    NoCommands,

    /// A referenced environment variable is not set
    #[error("Environment variable not found: {name}")]
    EnvVarNotFound { name: String },

    /// An include or exclude filter did not compile
    #[error("Invalid {input} filter: {source}")]
    InvalidFilter {
        input: String,
        #[source]
        source: HarvestError,
    },
}

/// Result type alias for configuration parsing
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Parsed and validated step configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Flutter SDK version, e.g. `3.22.0-stable`
    pub version: String,

    /// Directory the Flutter commands run in and the harvest root
    pub working_dir: PathBuf,

    /// Flutter commands to execute, in order
    pub commands: Vec<String>,

    /// Filter pair for the APK artifact class
    pub apk_filter: ArtifactFilter,

    /// Filter pair for the test APK artifact class
    pub test_apk_filter: ArtifactFilter,

    /// Filter pair for the mapping-file artifact class
    pub mapping_filter: ArtifactFilter,

    /// Destination root for harvested artifacts
    pub deploy_dir: PathBuf,
}

impl Config {
    /// Parse the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Parse the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let version = required(&lookup, "version")?;

        let working_dir = expand_path(
            &lookup,
            &lookup("working_dir").filter(|s| !s.is_empty()).unwrap_or_else(|| ".".to_string()),
        )?;

        let commands = split_commands(&required(&lookup, "commands")?);
        if commands.is_empty() {
            return Err(ConfigError::NoCommands);
        }

        let apk_filter = filter_pair(
            &lookup,
            "apk_file_include_filter",
            DEFAULT_APK_INCLUDE,
            "apk_file_exclude_filter",
            DEFAULT_APK_EXCLUDE,
        )?;
        let test_apk_filter = filter_pair(
            &lookup,
            "test_apk_file_include_filter",
            DEFAULT_TEST_APK_INCLUDE,
            "test_apk_file_exclude_filter",
            "",
        )?;
        let mapping_filter = filter_pair(
            &lookup,
            "mapping_file_include_filter",
            DEFAULT_MAPPING_INCLUDE,
            "mapping_file_exclude_filter",
            "",
        )?;

        let deploy_dir = match lookup("BITRISE_DEPLOY_DIR") {
            Some(dir) if !dir.is_empty() => expand_path(&lookup, &dir)?,
            _ => return Err(ConfigError::MissingDeployDir),
        };

        let config = Config {
            version,
            working_dir,
            commands,
            apk_filter,
            test_apk_filter,
            mapping_filter,
            deploy_dir,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate directory inputs
    pub fn validate(&self) -> Result<()> {
        if !self.working_dir.is_dir() {
            return Err(ConfigError::InvalidWorkingDir { path: self.working_dir.clone() });
        }

        if !self.deploy_dir.is_absolute() {
            return Err(ConfigError::RelativeDeployDir { path: self.deploy_dir.clone() });
        }

        Ok(())
    }

    /// Log the effective configuration, one line per input
    pub fn print(&self) {
        info!("Configuration:");
        info!("- version: {}", self.version);
        info!("- working_dir: {}", self.working_dir.display());
        info!("- commands: {}", self.commands.join(" | "));
        info!("- deploy_dir: {}", self.deploy_dir.display());
    }
}

/// Split the `|`-separated command list, dropping empty entries
fn split_commands(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|command| !command.is_empty())
        .map(str::to_string)
        .collect()
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingInput { name: name.to_string() }),
    }
}

fn filter_pair(
    lookup: &impl Fn(&str) -> Option<String>,
    include_name: &str,
    include_default: &str,
    exclude_name: &str,
    exclude_default: &str,
) -> Result<ArtifactFilter> {
    let include = lookup(include_name)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| include_default.to_string());
    let exclude = lookup(exclude_name).unwrap_or_else(|| exclude_default.to_string());

    ArtifactFilter::new(&include, &exclude).map_err(|source| ConfigError::InvalidFilter {
        input: include_name.to_string(),
        source,
    })
}

/// Expand `${VAR}` and `$VAR` references in a path-valued input
fn expand_path(lookup: &impl Fn(&str) -> Option<String>, raw: &str) -> Result<PathBuf> {
    let env_var_re =
        Regex::new(r"\$\{([^}]+)\}|\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex");

    let mut result = raw.to_string();
    for cap in env_var_re.captures_iter(raw) {
        let var_name = cap.get(1).or_else(|| cap.get(2)).unwrap().as_str();
        let var_value = lookup(var_name)
            .ok_or_else(|| ConfigError::EnvVarNotFound { name: var_name.to_string() })?;

        result = result.replace(&cap[0], &var_value);
    }

    Ok(PathBuf::from(result))
}
