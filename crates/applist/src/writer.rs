use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use glr_model::Game;
use tracing::{debug, error, info, warn};

use crate::error::AppListError;

/// AppList directory name.
pub const APPLIST_DIR_NAME: &str = "AppList";

const STAGING_DIR_NAME: &str = ".AppList.staging";
const BACKUP_DIR_NAME: &str = ".AppList.old";

/// Pause between wiping the old directory and renaming the new one in,
/// for filesystems that release directory handles lazily.
const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Writes game lists into an AppList directory.
#[derive(Debug, Clone)]
pub struct AppListWriter {
    dir: PathBuf,
}

impl AppListWriter {
    /// Targets `<base>/AppList`.
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            dir: base.as_ref().join(APPLIST_DIR_NAME),
        }
    }

    /// Targets the AppList next to the running executable.
    pub fn beside_executable() -> Self {
        Self::new(glr_config::paths::exe_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn sibling(&self, name: &str) -> PathBuf {
        self.dir
            .parent()
            .map(|parent| parent.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }

    /// Replaces the AppList with one file per game, in list order.
    ///
    /// Returns the number of files written.
    pub fn regenerate(&self, games: &[Game]) -> Result<usize, AppListError> {
        let staging = self.sibling(STAGING_DIR_NAME);
        if staging.exists() {
            debug!(path = %staging.display(), "removing stale staging directory");
            fs::remove_dir_all(&staging).map_err(|e| AppListError::io(&staging, e))?;
        }
        fs::create_dir_all(&staging).map_err(|e| AppListError::io(&staging, e))?;

        for (i, game) in games.iter().enumerate() {
            let path = staging.join(format!("{i}.txt"));
            fs::write(&path, &game.id).map_err(|e| AppListError::io(&path, e))?;
        }

        self.swap_in(&staging)?;
        info!(path = %self.dir.display(), count = games.len(), "AppList regenerated");
        Ok(games.len())
    }

    /// Moves `staging` into place of the current directory.
    fn swap_in(&self, staging: &Path) -> Result<(), AppListError> {
        self.swap_in_with(staging, |from, to| fs::rename(from, to))
    }

    /// Inner implementation that accepts the rename operation for testability.
    ///
    /// When neither the rename nor the wipe fallback puts `staging` in place,
    /// the previous list is moved back from the backup.
    fn swap_in_with(
        &self,
        staging: &Path,
        rename: impl Fn(&Path, &Path) -> std::io::Result<()>,
    ) -> Result<(), AppListError> {
        let backup = self.sibling(BACKUP_DIR_NAME);
        if backup.exists() {
            fs::remove_dir_all(&backup).map_err(|e| AppListError::io(&backup, e))?;
        }

        let backed_up = self.dir.exists()
            && match rename(self.dir.as_path(), backup.as_path()) {
                Ok(()) => true,
                Err(e) => {
                    warn!(path = %self.dir.display(), error = %e, "could not move AppList aside");
                    false
                }
            };

        let placed = match rename(staging, self.dir.as_path()) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(path = %self.dir.display(), error = %e, "rename swap failed, wiping instead");
                self.replace_by_wipe(staging, &rename)
            }
        };
        if let Err(e) = placed {
            if backed_up && !self.dir.exists() {
                match rename(backup.as_path(), self.dir.as_path()) {
                    Ok(()) => info!(path = %self.dir.display(), "previous AppList restored"),
                    Err(restore) => error!(
                        path = %backup.display(),
                        error = %restore,
                        "failed to restore previous AppList"
                    ),
                }
            }
            return Err(e);
        }

        if backup.exists() {
            if let Err(e) = fs::remove_dir_all(&backup) {
                warn!(path = %backup.display(), error = %e, "failed to remove AppList backup");
            }
        }
        Ok(())
    }

    fn replace_by_wipe(
        &self,
        staging: &Path,
        rename: &impl Fn(&Path, &Path) -> std::io::Result<()>,
    ) -> Result<(), AppListError> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir).map_err(|e| AppListError::io(&self.dir, e))?;
        }
        thread::sleep(SETTLE_DELAY);
        rename(staging, self.dir.as_path()).map_err(|e| AppListError::io(&self.dir, e))
    }

    /// Reads the current AppList back as ids, ordered by file number.
    ///
    /// Files whose stem is not a number are ignored. A missing directory
    /// reads as empty.
    pub fn read_ids(&self) -> Result<Vec<String>, AppListError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppListError::io(&self.dir, e)),
        };

        let mut numbered = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "txt") {
                continue;
            }
            let Some(index) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok())
            else {
                continue;
            };
            let content = fs::read_to_string(&path).map_err(|e| AppListError::io(&path, e))?;
            numbered.push((index, content.trim().to_string()));
        }

        numbered.sort_by_key(|(index, _)| *index);
        Ok(numbered.into_iter().map(|(_, id)| id).collect())
    }
}
