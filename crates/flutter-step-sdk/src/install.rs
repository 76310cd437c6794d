//! Flutter SDK download and extraction

use std::io::Write;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Result, SdkError};
use crate::platform::Platform;

const RELEASE_BASE_URL: &str = "https://storage.googleapis.com/flutter_infra/releases";

/// Build the release archive URL for a version string like `3.22.0-stable`.
/// The channel is the last `-`-separated component of the version.
pub fn archive_url(version: &str, platform: Platform) -> String {
    let channel = version.rsplit('-').next().unwrap_or(version);
    format!(
        "{RELEASE_BASE_URL}/{channel}/{platform}/flutter_{platform}_v{version}.{ext}",
        platform = platform.release_segment(),
        ext = platform.archive_ext(),
    )
}

/// Directory the SDK is installed into
pub fn sdk_destination_dir() -> Result<PathBuf> {
    destination_from(
        std::env::var("FLUTTER_SDK_DIR").ok(),
        std::env::var("HOME").ok(),
    )
}

fn destination_from(override_dir: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    match home.filter(|home| !home.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join("flutter-sdk").join("flutter")),
        None => Err(SdkError::Destination {
            reason: "neither FLUTTER_SDK_DIR nor HOME is set".to_string(),
        }),
    }
}

/// Install the requested SDK version unless it is already present.
/// Returns the SDK directory.
pub async fn ensure_sdk(version: &str) -> Result<PathBuf> {
    let destination = sdk_destination_dir()?;
    let platform = Platform::detect()?;
    ensure_sdk_at(destination, version, platform).await
}

/// Install the SDK into `destination` unless that directory already exists
pub async fn ensure_sdk_at(
    destination: PathBuf,
    version: &str,
    platform: Platform,
) -> Result<PathBuf> {
    if destination.is_dir() {
        info!("Flutter SDK directory already exists, skipping installation.");
        return Ok(destination);
    }

    let url = archive_url(version, platform);
    info!("Extracting Flutter SDK to {}", destination.display());

    let archive = download(&url).await?;

    // Archives contain a top-level flutter/ directory, so extraction
    // targets the destination's parent.
    let parent = destination
        .parent()
        .ok_or_else(|| SdkError::Destination {
            reason: format!("{} has no parent directory", destination.display()),
        })?
        .to_path_buf();
    std::fs::create_dir_all(&parent)?;

    extract(archive.path(), &parent, platform).await?;

    Ok(destination)
}

/// Stream the archive to a temp file, reporting progress
async fn download(url: &str) -> Result<NamedTempFile> {
    info!("Downloading {url}");

    let response = reqwest::get(url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|source| SdkError::Download { url: url.to_string(), source })?;

    let progress = match response.content_length() {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template("{bytes}/{total_bytes} [{bar:40}] {eta}")
                    .expect("Invalid progress template"),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            bar
        }
    };

    let mut archive = NamedTempFile::new()?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|source| SdkError::Download { url: url.to_string(), source })?;
        archive.write_all(&chunk)?;
        progress.inc(chunk.len() as u64);
    }
    archive.flush()?;
    progress.finish_and_clear();

    debug!("downloaded archive to {}", archive.path().display());
    Ok(archive)
}

/// Extract the archive with the host's unzip/tar
async fn extract(archive: &Path, into: &Path, platform: Platform) -> Result<()> {
    let mut command = match platform {
        Platform::MacOs => {
            let mut command = Command::new("unzip");
            command.arg("-q").arg(archive).arg("-d").arg(into);
            command
        }
        Platform::Linux => {
            let mut command = Command::new("tar");
            command.arg("-xJf").arg(archive).arg("-C").arg(into);
            command
        }
    };

    let status = command.status().await?;
    if !status.success() {
        return Err(SdkError::Extract {
            reason: format!("extractor exited with {status}"),
        });
    }

    Ok(())
}
