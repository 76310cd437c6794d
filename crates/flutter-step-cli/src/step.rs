//! The step flow: host checks, SDK install, build, harvest, export

use std::sync::Arc;

use chrono::{DateTime, Local};
use flutter_step_config::Config;
use flutter_step_harvest::{ArtifactCollector, Clock, DeployRecord, SystemClock};
use flutter_step_sdk::{ensure_android_sdk, ensure_host_tools, ensure_sdk, Platform};
use tracing::{info, warn};

use crate::error::StepError;
use crate::export::{EnvmanExporter, Exporter};
use crate::flutter::run_flutter_command;

/// Key for the most recent APK destination
pub const APK_PATH_KEY: &str = "BITRISE_APK_PATH";
/// Key for all APK destinations, joined with [`PATH_LIST_SEPARATOR`]
pub const APK_PATH_LIST_KEY: &str = "BITRISE_APK_PATH_LIST";
/// Key for the most recent test APK destination
pub const TEST_APK_PATH_KEY: &str = "BITRISE_TEST_APK_PATH";
/// Key for the most recent mapping file destination
pub const MAPPING_PATH_KEY: &str = "BITRISE_MAPPING_PATH";

/// Separator for the APK path list value
pub const PATH_LIST_SEPARATOR: &str = "|";

/// Execute the whole step
pub async fn run(config: Config) -> Result<(), StepError> {
    ensure_android_sdk()?;
    let platform = Platform::detect()?;
    ensure_host_tools(platform)?;

    let sdk_dir = ensure_sdk(&config.version).await?;

    // Everything modified from here on counts as produced by this build.
    let clock = Arc::new(SystemClock);
    let build_started = clock.now();

    for command in &config.commands {
        run_flutter_command(&sdk_dir, &config.working_dir, command).await?;
    }

    deploy_artifacts(&config, build_started, clock, &EnvmanExporter).await
}

/// Harvest the three artifact classes and publish their deploy paths.
/// Classes are independent; any failure aborts the remaining ones.
pub async fn deploy_artifacts(
    config: &Config,
    build_started: DateTime<Local>,
    clock: Arc<dyn Clock>,
    exporter: &dyn Exporter,
) -> Result<(), StepError> {
    let collector = ArtifactCollector::new(config.deploy_dir.clone(), clock);

    info!("Move apk files...");
    let apks = collector
        .collect(&config.working_dir, &config.apk_filter, build_started)
        .await?;
    report_outcome(&apks, "apk");

    if let Some(last) = apks.last_path() {
        let value = last.to_string_lossy();
        exporter.export(APK_PATH_KEY, &value).await?;
        info!("The apk path is now available in ${APK_PATH_KEY} (value: {value})");
    }
    if !apks.is_empty() {
        let list = apks
            .deployed
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(PATH_LIST_SEPARATOR);
        exporter.export(APK_PATH_LIST_KEY, &list).await?;
        info!("The apk path list is now available in ${APK_PATH_LIST_KEY} (value: {list})");
    }

    info!("Move test apk files...");
    let test_apks = collector
        .collect(&config.working_dir, &config.test_apk_filter, build_started)
        .await?;
    report_outcome(&test_apks, "test apk");

    if let Some(last) = test_apks.last_path() {
        let value = last.to_string_lossy();
        exporter.export(TEST_APK_PATH_KEY, &value).await?;
        info!("The test apk path is now available in ${TEST_APK_PATH_KEY} (value: {value})");
    }

    info!("Move mapping files...");
    let mappings = collector
        .collect(&config.working_dir, &config.mapping_filter, build_started)
        .await?;
    report_outcome(&mappings, "mapping file");

    if let Some(last) = mappings.last_path() {
        let value = last.to_string_lossy();
        exporter.export(MAPPING_PATH_KEY, &value).await?;
        info!("The mapping path is now available in ${MAPPING_PATH_KEY} (value: {value})");
    }

    Ok(())
}

/// Zero matches and all-stale are different non-fatal conditions; the
/// calling system may react differently to "nothing built" vs "only old
/// artifacts present".
fn report_outcome(record: &DeployRecord, label: &str) {
    if record.matched == 0 {
        warn!("No file name matched the {label} filters");
    } else if record.only_stale() {
        warn!(
            "All {} matched {label} file(s) were modified before the build started",
            record.matched
        );
    }
}
