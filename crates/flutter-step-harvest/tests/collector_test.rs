//! Integration tests for artifact collection

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone};
use filetime::{set_file_mtime, FileTime};
use flutter_step_harvest::{ArtifactCollector, ArtifactFilter, Clock, HarvestError};
use tempfile::TempDir;

/// Deterministic clock: advances one second per `now` call, never sleeps
struct TickingClock(Mutex<DateTime<Local>>);

impl TickingClock {
    fn new() -> Self {
        Self(Mutex::new(Local.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()))
    }
}

#[async_trait]
impl Clock for TickingClock {
    fn now(&self) -> DateTime<Local> {
        let mut now = self.0.lock().unwrap();
        let current = *now;
        *now += ChronoDuration::seconds(1);
        current
    }

    async fn sleep(&self, _duration: Duration) {}
}

fn collector(deploy: &Path) -> ArtifactCollector {
    ArtifactCollector::new(deploy.to_path_buf(), Arc::new(TickingClock::new()))
}

fn set_mtime(path: &Path, time: SystemTime) {
    set_file_mtime(path, FileTime::from_system_time(time)).unwrap();
}

#[tokio::test]
async fn zero_matches_yield_an_empty_record() {
    let root = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();
    fs::write(root.path().join("readme.txt"), b"txt").unwrap();

    let filter = ArtifactFilter::new("*.apk", "").unwrap();
    let record = collector(deploy.path())
        .collect(root.path(), &filter, Local::now())
        .await
        .unwrap();

    assert!(record.is_empty());
    assert!(record.last.is_none());
    assert_eq!(record.matched, 0);
    assert!(!record.only_stale());
}

#[tokio::test]
async fn stale_files_are_skipped_fresh_files_are_copied() {
    let root = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();

    let now = SystemTime::now();
    let reference: DateTime<Local> = now.into();

    let fresh = root.path().join("app-debug.apk");
    let stale = root.path().join("app-release.apk");
    fs::write(&fresh, b"fresh").unwrap();
    fs::write(&stale, b"stale").unwrap();
    set_mtime(&fresh, now + Duration::from_secs(5));
    set_mtime(&stale, now - Duration::from_secs(5));

    let filter = ArtifactFilter::new("*.apk", "").unwrap();
    let record = collector(deploy.path())
        .collect(root.path(), &filter, reference)
        .await
        .unwrap();

    assert_eq!(record.deployed, vec![deploy.path().join("app-debug.apk")]);
    assert_eq!(record.last_path(), Some(deploy.path().join("app-debug.apk").as_path()));
    assert_eq!(record.matched, 2);
    assert_eq!(record.skipped_stale, 1);
    assert_eq!(fs::read(deploy.path().join("app-debug.apk")).unwrap(), b"fresh");
}

#[tokio::test]
async fn mtime_equal_to_the_reference_is_not_stale() {
    let root = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();

    let file = root.path().join("app.apk");
    fs::write(&file, b"apk").unwrap();
    // Read the stored mtime back so the reference matches it exactly,
    // whatever the filesystem's timestamp resolution.
    let stored = fs::metadata(&file).unwrap().modified().unwrap();
    let reference: DateTime<Local> = stored.into();

    let filter = ArtifactFilter::new("*.apk", "").unwrap();
    let record = collector(deploy.path())
        .collect(root.path(), &filter, reference)
        .await
        .unwrap();

    assert_eq!(record.deployed.len(), 1);
    assert_eq!(record.skipped_stale, 0);
}

#[tokio::test]
async fn all_stale_is_distinct_from_zero_matches() {
    let root = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();

    let now = SystemTime::now();
    let stale = root.path().join("app.apk");
    fs::write(&stale, b"stale").unwrap();
    set_mtime(&stale, now - Duration::from_secs(60));

    let filter = ArtifactFilter::new("*.apk", "").unwrap();
    let record = collector(deploy.path())
        .collect(root.path(), &filter, now.into())
        .await
        .unwrap();

    assert!(record.is_empty());
    assert!(record.only_stale());
    assert_eq!(record.matched, 1);
    assert_eq!(record.skipped_stale, 1);
}

#[tokio::test]
async fn existing_deploy_file_forces_a_timestamped_name() {
    let root = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();

    fs::write(root.path().join("app-debug.apk"), b"new").unwrap();
    fs::write(deploy.path().join("app-debug.apk"), b"previous").unwrap();

    let filter = ArtifactFilter::new("*.apk", "").unwrap();
    let record = collector(deploy.path())
        .collect(root.path(), &filter, Local.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
        .await
        .unwrap();

    assert_eq!(record.deployed.len(), 1);
    let dest = &record.deployed[0];
    assert_ne!(dest, &deploy.path().join("app-debug.apk"));
    let name = dest.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("app-debug2024"));
    assert!(name.ends_with(".apk"));
    // The pre-existing file is untouched.
    assert_eq!(fs::read(deploy.path().join("app-debug.apk")).unwrap(), b"previous");
}

#[tokio::test]
async fn same_base_name_in_two_subdirectories_stays_distinct() {
    let root = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();

    fs::create_dir_all(root.path().join("debug")).unwrap();
    fs::create_dir_all(root.path().join("release")).unwrap();
    fs::write(root.path().join("debug/app.apk"), b"debug").unwrap();
    fs::write(root.path().join("release/app.apk"), b"release").unwrap();

    let filter = ArtifactFilter::new("*.apk", "").unwrap();
    let record = collector(deploy.path())
        .collect(root.path(), &filter, Local.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
        .await
        .unwrap();

    assert_eq!(record.deployed.len(), 2);
    assert_ne!(record.deployed[0], record.deployed[1]);
    // Discovery order is deterministic: debug/ sorts before release/.
    assert_eq!(record.deployed[0], deploy.path().join("app.apk"));
    assert_eq!(fs::read(&record.deployed[0]).unwrap(), b"debug");
    assert_eq!(fs::read(&record.deployed[1]).unwrap(), b"release");
    assert_eq!(record.last_path(), Some(record.deployed[1].as_path()));
}

#[tokio::test]
async fn excluded_files_are_never_copied() {
    let root = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();

    fs::write(root.path().join("app.apk"), b"keep").unwrap();
    fs::write(root.path().join("app-unaligned.apk"), b"drop").unwrap();

    let filter = ArtifactFilter::new("*.apk", "*unaligned.apk").unwrap();
    let record = collector(deploy.path())
        .collect(root.path(), &filter, Local.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
        .await
        .unwrap();

    assert_eq!(record.deployed, vec![deploy.path().join("app.apk")]);
}

#[tokio::test]
async fn missing_root_aborts_with_a_discovery_error() {
    let deploy = TempDir::new().unwrap();

    let filter = ArtifactFilter::new("*.apk", "").unwrap();
    let result = collector(deploy.path())
        .collect(Path::new("/nonexistent/flutter/workspace"), &filter, Local::now())
        .await;

    assert!(matches!(result, Err(HarvestError::Discovery { .. })));
}
