//! Storage locations, fixed relative to the running executable.
//!
//! ```text
//! <exe_dir>/
//! ├── AppList/            (written by glr-applist)
//! └── GLR_Manager/
//!     ├── config.json
//!     └── Profiles/
//!         └── <name>.json
//! ```

use std::path::{Path, PathBuf};

/// Directory holding config and profiles, next to the executable.
pub const BASE_DIR_NAME: &str = "GLR_Manager";

/// Profile documents directory under the base directory.
pub const PROFILES_DIR_NAME: &str = "Profiles";

/// Config document name under the base directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Returns the directory containing the running executable.
///
/// Falls back to the current directory when the executable path cannot be
/// resolved.
pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns `<exe_dir>/GLR_Manager`.
pub fn base_dir() -> PathBuf {
    exe_dir().join(BASE_DIR_NAME)
}

/// Returns the profile directory under `base`.
pub fn profiles_dir(base: &Path) -> PathBuf {
    base.join(PROFILES_DIR_NAME)
}

/// Returns the config document path under `base`.
pub fn config_path(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_base() {
        let base = Path::new("/opt/glr/GLR_Manager");
        assert_eq!(
            profiles_dir(base),
            PathBuf::from("/opt/glr/GLR_Manager/Profiles")
        );
        assert_eq!(
            config_path(base),
            PathBuf::from("/opt/glr/GLR_Manager/config.json")
        );
    }

    #[test]
    fn base_dir_is_next_to_executable() {
        let base = base_dir();
        assert!(base.ends_with(BASE_DIR_NAME));
        assert_eq!(base.parent().unwrap(), exe_dir());
    }
}
