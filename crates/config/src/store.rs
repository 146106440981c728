use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use glr_model::{CURRENT_VERSION, Config};
use tracing::{debug, error, info, warn};

use crate::error::ConfigError;
use crate::paths;

/// File that marks a directory as a GreenLuma install.
pub const LOADER_MARKER: &str = "DLLInjector.exe";

/// Owner of the process-wide [`Config`].
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    /// Loads `config.json` from `base_dir`.
    pub fn load(base_dir: &Path) -> Self {
        Self::load_from(paths::config_path(base_dir))
    }

    /// Loads the config document at `path`.
    ///
    /// A missing document yields defaults. An unreadable or malformed one is
    /// logged and replaced by defaults. Either way the version is bumped to
    /// [`CURRENT_VERSION`] and the document is written back.
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let config = if path.is_file() {
            match read_document(&path) {
                Ok(config) => config,
                Err(e) => {
                    error!(
                        path = %path.display(),
                        error = %e,
                        "failed to load config, using defaults"
                    );
                    Config::default()
                }
            }
        } else {
            info!(path = %path.display(), "no config found, creating defaults");
            Config::default()
        };

        let mut store = Self { path, config };
        if store.config.version != CURRENT_VERSION {
            debug!(from = %store.config.version, to = CURRENT_VERSION, "upgrading config version");
            store.config.version = CURRENT_VERSION.to_string();
        }
        if let Err(e) = store.save() {
            error!(path = %store.path.display(), error = %e, "failed to persist config");
        }
        store
    }

    /// Returns the live config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the backing document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a mutation scope over the live config.
    ///
    /// The config is saved exactly once when the returned guard goes away,
    /// also when the scope unwinds from a panic.
    pub fn scoped(&mut self) -> ConfigGuard<'_> {
        ConfigGuard {
            store: self,
            armed: true,
        }
    }

    /// Runs `f` inside a mutation scope and returns its result.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut Config) -> R) -> Result<R, ConfigError> {
        let mut guard = self.scoped();
        let out = f(&mut guard);
        guard.commit()?;
        Ok(out)
    }

    /// Writes the full field set to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.path, content)?;

        debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}

/// Mutable access to the live config; saves on drop.
pub struct ConfigGuard<'a> {
    store: &'a mut ConfigStore,
    armed: bool,
}

impl ConfigGuard<'_> {
    /// Saves now and reports the result instead of logging it.
    pub fn commit(mut self) -> Result<(), ConfigError> {
        self.armed = false;
        self.store.save()
    }
}

impl Deref for ConfigGuard<'_> {
    type Target = Config;

    fn deref(&self) -> &Config {
        &self.store.config
    }
}

impl DerefMut for ConfigGuard<'_> {
    fn deref_mut(&mut self) -> &mut Config {
        &mut self.store.config
    }
}

impl Drop for ConfigGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = self.store.save() {
            error!(path = %self.store.path.display(), error = %e, "failed to persist config");
        }
    }
}

/// Reads and decodes a config document, applying legacy migrations.
///
/// Every recognized key is applied on its own: a key whose value has the
/// wrong type is logged and left at its default.
fn read_document(path: &Path) -> Result<Config, ConfigError> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|e| ConfigError::Decode(e.to_string()))?;
    let value: serde_json::Value = serde_json::from_str(&text)?;

    let serde_json::Value::Object(document) = value else {
        return Err(ConfigError::Decode("top level is not an object".into()));
    };
    let has_loader_path = document.contains_key("greenluma_path");
    let has_steam_path = document.contains_key("steam_path");

    let serde_json::Value::Object(mut merged) = serde_json::to_value(Config::default())? else {
        return Err(ConfigError::Decode("config does not serialize to an object".into()));
    };
    for (key, field) in document {
        if !merged.contains_key(&key) {
            debug!(key = %key, "ignoring unknown config key");
            continue;
        }
        let single: serde_json::Map<_, _> = [(key.clone(), field.clone())].into_iter().collect();
        match serde_json::from_value::<Config>(serde_json::Value::Object(single)) {
            Ok(_) => {
                merged.insert(key, field);
            }
            Err(e) => warn!(key = %key, error = %e, "ignoring invalid config value"),
        }
    }

    let mut config: Config = serde_json::from_value(serde_json::Value::Object(merged))?;
    if !has_loader_path && has_steam_path {
        migrate_loader_path(&mut config);
    }
    Ok(config)
}

/// Backfills `greenluma_path` for documents written before the field existed.
///
/// Older versions kept GreenLuma inside the Steam directory, so the Steam
/// path is reused when it hosts the injector.
fn migrate_loader_path(config: &mut Config) {
    if config.steam_path.is_empty() {
        return;
    }
    let marker = Path::new(&config.steam_path).join(LOADER_MARKER);
    if marker.is_file() {
        info!(path = %config.steam_path, "migrating legacy GreenLuma path from steam_path");
        config.greenluma_path = config.steam_path.clone();
    } else {
        warn!(
            path = %config.steam_path,
            "legacy config without greenluma_path, injector not found"
        );
    }
}
