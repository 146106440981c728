//! In-memory profile index backed by one JSON document per profile.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glr_model::{Game, Profile};
use tracing::{debug, info, warn};

use crate::error::ProfileError;

/// Profile seeded into an empty profile directory.
pub const DEFAULT_PROFILE: &str = "default";

/// A profile document that could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedProfile {
    pub path: PathBuf,
    pub reason: String,
}

/// Index of profiles keyed by name.
#[derive(Debug)]
pub struct ProfileManager {
    dir: PathBuf,
    profiles: BTreeMap<String, Profile>,
    /// Documents each profile was loaded from, in load order.
    sources: BTreeMap<String, Vec<PathBuf>>,
    skipped: Vec<SkippedProfile>,
}

impl ProfileManager {
    /// Loads every profile document in `dir`.
    ///
    /// Creates the directory when missing and seeds a `"default"` profile
    /// when it holds no `.json` documents. Documents that fail to read or
    /// decode, or whose name is not a valid profile name, are logged and
    /// listed in [`skipped`](Self::skipped).
    pub fn load_all(dir: impl Into<PathBuf>) -> Result<Self, ProfileError> {
        let mut manager = Self {
            dir: dir.into(),
            profiles: BTreeMap::new(),
            sources: BTreeMap::new(),
            skipped: Vec::new(),
        };

        let created = !manager.dir.exists();
        if created {
            fs::create_dir_all(&manager.dir)?;
        }
        let documents = list_documents(&manager.dir)?;
        if documents.is_empty() {
            info!(dir = %manager.dir.display(), created, "seeding default profile");
            manager.create(DEFAULT_PROFILE, Vec::new())?;
            return Ok(manager);
        }

        for path in documents {
            let loaded = read_document(&path).and_then(|profile| {
                validate_name(&profile.name)?;
                Ok(profile)
            });
            match loaded {
                Ok(profile) => {
                    debug!(name = %profile.name, games = profile.games.len(), "loaded profile");
                    manager
                        .sources
                        .entry(profile.name.clone())
                        .or_default()
                        .push(path);
                    manager.insert(profile);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable profile");
                    manager.skipped.push(SkippedProfile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(manager)
    }

    /// Inserts a profile into the index, replacing any profile of the same name.
    ///
    /// Fails with [`ProfileError::InvalidName`] for names that cannot be
    /// stored in the profile directory.
    pub fn register(&mut self, profile: Profile) -> Result<(), ProfileError> {
        validate_name(&profile.name)?;
        self.insert(profile);
        Ok(())
    }

    fn insert(&mut self, profile: Profile) {
        if let Some(previous) = self.profiles.insert(profile.name.clone(), profile) {
            debug!(name = %previous.name, "replaced profile with the same name");
        }
    }

    /// Document that receives writes for `name`: the last one it was loaded
    /// from, or `<dir>/<name>.json`.
    fn document_path(&self, name: &str) -> PathBuf {
        self.sources
            .get(name)
            .and_then(|paths| paths.last())
            .cloned()
            .unwrap_or_else(|| self.dir.join(format!("{name}.json")))
    }

    /// Creates a profile and writes its document.
    ///
    /// An empty name is treated as a cancelled creation and returns
    /// `Ok(false)` without touching the index.
    pub fn create(&mut self, name: &str, games: Vec<Game>) -> Result<bool, ProfileError> {
        if name.is_empty() {
            return Ok(false);
        }
        validate_name(name)?;

        let profile = Profile::with_games(name, games);
        write_document(&self.document_path(name), &profile)?;
        self.insert(profile);
        info!(name, "created profile");
        Ok(true)
    }

    /// Removes a profile from the index and deletes every document it was
    /// loaded from.
    pub fn remove(&mut self, name: &str) -> Result<Profile, ProfileError> {
        let profile = self
            .profiles
            .remove(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;

        let paths = self
            .sources
            .remove(name)
            .unwrap_or_else(|| vec![self.dir.join(format!("{name}.json"))]);
        for path in paths {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "deleted profile document"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(path = %path.display(), "profile document already gone");
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(name, "removed profile");
        Ok(profile)
    }

    /// Writes the document of an indexed profile.
    pub fn save(&self, name: &str) -> Result<(), ProfileError> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
        write_document(&self.document_path(name), profile)
    }

    /// Mutates a profile in place and writes its document afterwards.
    ///
    /// The profile keeps its name; renames inside `f` are reverted.
    pub fn edit<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Profile) -> R,
    ) -> Result<R, ProfileError> {
        let path = self.document_path(name);
        let profile = self
            .profiles
            .get_mut(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;

        let out = f(profile);
        if profile.name != name {
            warn!(name, attempted = %profile.name, "profile rename is not supported here");
            profile.name = name.to_string();
        }
        write_document(&path, profile)?;
        Ok(out)
    }

    /// Returns the profile with the given name.
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Returns the profile for in-memory mutation; call [`save`](Self::save)
    /// to persist.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.profiles.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Profile names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Profiles in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Documents that failed to load.
    pub fn skipped(&self) -> &[SkippedProfile] {
        &self.skipped
    }

    /// Directory holding the profile documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Rejects names that would escape the profile directory.
fn validate_name(name: &str) -> Result<(), ProfileError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ProfileError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Lists `.json` files in `dir`, sorted for a stable registration order.
fn list_documents(dir: &Path) -> Result<Vec<PathBuf>, ProfileError> {
    let mut documents = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == "json") {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

fn read_document(path: &Path) -> Result<Profile, ProfileError> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|e| ProfileError::Decode(e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}

fn write_document(path: &Path, profile: &Profile) -> Result<(), ProfileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(profile)?;
    fs::write(path, content)?;
    debug!(path = %path.display(), "profile saved");
    Ok(())
}
