use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, error, info};

use crate::error::UpdateError;

/// Conventional updater executable name.
pub const UPDATER_EXE: &str = "GL2020 Updater.exe";

/// Skips the updater launch.
pub const NO_UPDATE_FLAG: &str = "-NoUpdate";

/// Set by the updater when it restarts the manager.
pub const POST_UPDATE_FLAG: &str = "-PostUpdate";

/// Prefix of replacement files waiting to be swapped in.
pub const PENDING_PREFIX: &str = "new_";

/// Update-related command line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateFlags {
    pub no_update: bool,
    pub post_update: bool,
}

impl UpdateFlags {
    /// Scans `args` for the update flags. Other arguments are ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for arg in args {
            match arg.as_ref() {
                NO_UPDATE_FLAG => flags.no_update = true,
                POST_UPDATE_FLAG => flags.post_update = true,
                _ => {}
            }
        }
        flags
    }
}

/// Outcome of the startup update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    /// `check_update` is off in the config.
    Disabled,
    /// `-NoUpdate` was passed.
    Suppressed,
    /// No updater executable in the work directory.
    Missing,
    /// The updater ran; carries its exit code.
    Completed(Option<i32>),
    /// The updater could not be launched.
    Failed(String),
}

/// Runs the external updater and applies the files it leaves behind.
#[derive(Debug, Clone)]
pub struct Updater {
    work_dir: PathBuf,
    executable: String,
}

impl Updater {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self::with_executable(work_dir, UPDATER_EXE)
    }

    /// Uses a different updater executable name inside `work_dir`.
    pub fn with_executable(work_dir: impl Into<PathBuf>, executable: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            executable: executable.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn executable_path(&self) -> PathBuf {
        self.work_dir.join(&self.executable)
    }

    /// Launches the updater and waits for it to exit.
    ///
    /// Launch errors are logged and returned as [`UpdateCheck::Failed`].
    pub fn check_for_updates(&self, enabled: bool, flags: UpdateFlags) -> UpdateCheck {
        if flags.no_update {
            debug!("update check suppressed by {NO_UPDATE_FLAG}");
            return UpdateCheck::Suppressed;
        }
        if !enabled {
            debug!("update check disabled in config");
            return UpdateCheck::Disabled;
        }
        let exe = self.executable_path();
        if !exe.is_file() {
            debug!(path = %exe.display(), "updater not found");
            return UpdateCheck::Missing;
        }

        info!(path = %exe.display(), "running updater");
        match Command::new(&exe).current_dir(&self.work_dir).status() {
            Ok(status) => {
                debug!(code = ?status.code(), "updater exited");
                UpdateCheck::Completed(status.code())
            }
            Err(e) => {
                error!(path = %exe.display(), error = %e, "error while checking for updates");
                UpdateCheck::Failed(e.to_string())
            }
        }
    }

    /// Replaces every `<name>` with its pending `new_<name>` file.
    ///
    /// Returns the replaced target paths in name order.
    pub fn apply_pending(&self) -> Result<Vec<PathBuf>, UpdateError> {
        let entries = fs::read_dir(&self.work_dir).map_err(|e| UpdateError::io(&self.work_dir, e))?;

        let mut pending: Vec<(PathBuf, String)> = entries
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let target = name.strip_prefix(PENDING_PREFIX)?;
                if target.is_empty() {
                    return None;
                }
                Some((entry.path(), target.to_string()))
            })
            .collect();
        pending.sort_by(|a, b| a.1.cmp(&b.1));

        let mut swapped = Vec::with_capacity(pending.len());
        for (source, target) in pending {
            let target = self.work_dir.join(target);
            if target.exists() {
                fs::remove_file(&target).map_err(|e| UpdateError::io(&target, e))?;
            }
            fs::rename(&source, &target).map_err(|e| UpdateError::io(&source, e))?;
            info!(file = %target.display(), "applied pending update");
            swapped.push(target);
        }
        Ok(swapped)
    }

    /// Startup sequence: update check, then the file swap after an update.
    pub fn run(&self, enabled: bool, flags: UpdateFlags) -> (UpdateCheck, Vec<PathBuf>) {
        let check = self.check_for_updates(enabled, flags);
        if !flags.post_update {
            return (check, Vec::new());
        }
        match self.apply_pending() {
            Ok(swapped) => (check, swapped),
            Err(e) => {
                error!(error = %e, "failed to apply pending update");
                (check, Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_from_args() {
        let flags = UpdateFlags::from_args(["glr-manager", "-PostUpdate", "apply"]);
        assert!(flags.post_update);
        assert!(!flags.no_update);

        let flags = UpdateFlags::from_args(vec!["-NoUpdate".to_string()]);
        assert!(flags.no_update);
        assert_eq!(UpdateFlags::from_args(["-noupdate"]), UpdateFlags::default());
    }

    #[test]
    fn suppressed_beats_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let updater = Updater::new(tmp.path());
        let flags = UpdateFlags {
            no_update: true,
            post_update: false,
        };
        assert_eq!(updater.check_for_updates(false, flags), UpdateCheck::Suppressed);
        assert_eq!(
            updater.check_for_updates(false, UpdateFlags::default()),
            UpdateCheck::Disabled
        );
    }

    #[test]
    fn missing_executable() {
        let tmp = tempfile::tempdir().unwrap();
        let updater = Updater::new(tmp.path());
        assert_eq!(
            updater.check_for_updates(true, UpdateFlags::default()),
            UpdateCheck::Missing
        );
    }

    #[cfg(unix)]
    #[test]
    fn runs_executable_and_reports_exit_code() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("updater.sh");
        fs::write(&script, "#!/bin/sh\nexit 3\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let updater = Updater::with_executable(tmp.path(), "updater.sh");
        assert_eq!(
            updater.check_for_updates(true, UpdateFlags::default()),
            UpdateCheck::Completed(Some(3))
        );
    }

    #[cfg(unix)]
    #[test]
    fn launch_failure_is_reported_not_raised() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let exe = tmp.path().join(UPDATER_EXE);
        fs::write(&exe, "not a program").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o644)).unwrap();

        let updater = Updater::new(tmp.path());
        assert!(matches!(
            updater.check_for_updates(true, UpdateFlags::default()),
            UpdateCheck::Failed(_)
        ));
    }

    #[test]
    fn apply_pending_swaps_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("manager.exe"), "old").unwrap();
        fs::write(tmp.path().join("new_manager.exe"), "new").unwrap();
        fs::write(tmp.path().join("new_readme.txt"), "fresh").unwrap();
        fs::write(tmp.path().join("config.json"), "{}").unwrap();
        fs::create_dir(tmp.path().join("new_dir")).unwrap();

        let swapped = Updater::new(tmp.path()).apply_pending().unwrap();
        assert_eq!(
            swapped,
            [tmp.path().join("manager.exe"), tmp.path().join("readme.txt")]
        );
        assert_eq!(fs::read_to_string(tmp.path().join("manager.exe")).unwrap(), "new");
        assert_eq!(fs::read_to_string(tmp.path().join("readme.txt")).unwrap(), "fresh");
        assert!(!tmp.path().join("new_manager.exe").exists());
        assert!(tmp.path().join("new_dir").is_dir());
    }

    #[test]
    fn run_swaps_only_after_update() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("new_a.dll"), "a").unwrap();
        let updater = Updater::new(tmp.path());

        let (check, swapped) = updater.run(true, UpdateFlags::default());
        assert_eq!(check, UpdateCheck::Missing);
        assert!(swapped.is_empty());
        assert!(tmp.path().join("new_a.dll").exists());

        let flags = UpdateFlags::from_args(["-NoUpdate", "-PostUpdate"]);
        let (check, swapped) = updater.run(true, flags);
        assert_eq!(check, UpdateCheck::Suppressed);
        assert_eq!(swapped, [tmp.path().join("a.dll")]);
    }
}
