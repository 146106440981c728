//! User preferences persisted as `config.json`.

use serde::{Deserialize, Serialize};

/// Schema version written into every saved config.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Flat user preferences.
///
/// Every field has a default, so a document only needs the keys it wants to
/// override. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Steam install directory.
    #[serde(default)]
    pub steam_path: String,

    /// GreenLuma install directory.
    #[serde(default)]
    pub greenluma_path: String,

    #[serde(default = "default_true")]
    pub no_hook: bool,

    /// Version of the build that last wrote the document.
    #[serde(default = "default_version")]
    pub version: String,

    /// Profile that was active when the manager last closed.
    #[serde(default = "default_profile")]
    pub last_profile: String,

    /// Run the external updater at startup.
    #[serde(default = "default_true")]
    pub check_update: bool,

    /// Query SteamDB instead of the Steam store.
    #[serde(default)]
    pub use_steamdb: bool,

    #[serde(default)]
    pub manager_msg: bool,
}

fn default_true() -> bool {
    true
}

fn default_version() -> String {
    CURRENT_VERSION.to_string()
}

fn default_profile() -> String {
    "default".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_path: String::new(),
            greenluma_path: String::new(),
            no_hook: default_true(),
            version: default_version(),
            last_profile: default_profile(),
            check_update: default_true(),
            use_steamdb: false,
            manager_msg: false,
        }
    }
}
