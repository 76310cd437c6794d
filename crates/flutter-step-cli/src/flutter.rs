//! Running configured Flutter commands

use std::path::Path;

use tokio::process::Command;
use tracing::info;

use crate::error::StepError;

/// Run one Flutter command via `bash -c` in the working directory,
/// inheriting the step's stdout/stderr. A nonzero exit is fatal.
pub async fn run_flutter_command(
    sdk_dir: &Path,
    working_dir: &Path,
    command: &str,
) -> Result<(), StepError> {
    let flutter = sdk_dir.join("bin").join("flutter");
    info!("Executing Flutter command: {command}");

    let status = Command::new("bash")
        .arg("-c")
        .arg(format!("{} {}", flutter.display(), command))
        .current_dir(working_dir)
        .status()
        .await
        .map_err(|source| StepError::BuildSpawn { command: command.to_string(), source })?;

    if !status.success() {
        return Err(StepError::BuildCommand { command: command.to_string(), status });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    /// Fake SDK whose bin/flutter records its arguments and exits 0
    fn fake_sdk(exit_code: i32) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();

        let script = bin.join("flutter");
        fs::write(&script, format!("#!/bin/bash\necho \"$@\" > \"$(dirname \"$0\")/args\"\nexit {exit_code}\n"))
            .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let sdk = dir.path().to_path_buf();
        (dir, sdk)
    }

    #[tokio::test]
    async fn successful_command_passes_its_arguments() {
        let (dir, sdk) = fake_sdk(0);
        let workspace = TempDir::new().unwrap();

        run_flutter_command(&sdk, workspace.path(), "build apk --release")
            .await
            .unwrap();

        let args = fs::read_to_string(dir.path().join("bin/args")).unwrap();
        assert_eq!(args.trim(), "build apk --release");
    }

    #[tokio::test]
    async fn failing_command_is_fatal() {
        let (_dir, sdk) = fake_sdk(1);
        let workspace = TempDir::new().unwrap();

        let err = run_flutter_command(&sdk, workspace.path(), "build apk")
            .await
            .unwrap_err();

        assert!(matches!(err, StepError::BuildCommand { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
