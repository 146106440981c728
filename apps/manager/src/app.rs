//! Manager context and command execution.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use glr_applist::AppListWriter;
use glr_catalog::{Catalog, CatalogSource, QueryOutcome};
use glr_config::{ConfigStore, paths};
use glr_model::Game;
use glr_profiles::ProfileManager;

use crate::cli::Command;

/// Everything a command needs, owned in one place.
pub struct Manager {
    config: ConfigStore,
    profiles: ProfileManager,
    catalog: Catalog,
    applist: AppListWriter,
}

impl Manager {
    /// Opens the manager rooted next to the executable.
    pub fn open() -> anyhow::Result<Self> {
        Self::open_at(&paths::base_dir(), AppListWriter::beside_executable())
    }

    /// Opens the manager with config and profiles under `base`.
    pub fn open_at(base: &Path, applist: AppListWriter) -> anyhow::Result<Self> {
        let config = ConfigStore::load(base);
        let profiles = ProfileManager::load_all(paths::profiles_dir(base))
            .context("failed to load profiles")?;
        let source = CatalogSource::from_preference(config.config().use_steamdb);
        let catalog = Catalog::new(source).context("failed to build HTTP client")?;

        tracing::info!(
            profiles = profiles.len(),
            skipped = profiles.skipped().len(),
            source = ?source,
            "manager ready"
        );
        Ok(Self {
            config,
            profiles,
            catalog,
            applist,
        })
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Runs one command, writing human readable output to `out`.
    pub async fn execute(&mut self, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
        match command {
            Command::Profiles => self.list_profiles(out),
            Command::Show(name) => self.show(&name, out),
            Command::Create(name) => {
                if !self.profiles.create(&name, Vec::new())? {
                    bail!("profile name must not be empty");
                }
                writeln!(out, "created profile {name}")?;
                Ok(())
            }
            Command::Remove(name) => {
                let removed = self.profiles.remove(&name)?;
                writeln!(
                    out,
                    "removed profile {} ({} games)",
                    removed.name,
                    removed.games.len()
                )?;
                Ok(())
            }
            Command::Search { query, into } => self.search(&query, into.as_deref(), out).await,
            Command::Dlc(url) => {
                let games = found(self.catalog.list_dlc(&url).await)?;
                print_games(&games, out)
            }
            Command::Apply(name) => self.apply(name, out),
            Command::AppList => {
                for (i, id) in self.applist.read_ids()?.iter().enumerate() {
                    writeln!(out, "{i}: {id}")?;
                }
                Ok(())
            }
        }
    }

    fn list_profiles(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let last = &self.config.config().last_profile;
        for profile in self.profiles.iter() {
            let marker = if &profile.name == last { "*" } else { " " };
            writeln!(out, "{marker} {} ({} games)", profile.name, profile.games.len())?;
        }
        for skipped in self.profiles.skipped() {
            writeln!(out, "! {} ({})", skipped.path.display(), skipped.reason)?;
        }
        Ok(())
    }

    fn show(&self, name: &str, out: &mut impl Write) -> anyhow::Result<()> {
        let Some(profile) = self.profiles.get(name) else {
            bail!("no profile named {name:?}");
        };
        print_games(&profile.games, out)
    }

    async fn search(
        &mut self,
        query: &str,
        into: Option<&str>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        if let Some(target) = into {
            if !self.profiles.contains(target) {
                bail!("no profile named {target:?}");
            }
        }

        let games = found(self.catalog.search(query).await)?;
        print_games(&games, out)?;

        if let Some(target) = into {
            let added = games.len();
            self.profiles
                .edit(target, |profile| profile.games.extend(games))?;
            writeln!(out, "added {added} entries to {target}")?;
        }
        Ok(())
    }

    /// Writes a profile to the AppList and remembers it as the last profile.
    fn apply(&mut self, name: Option<String>, out: &mut impl Write) -> anyhow::Result<()> {
        let name = name.unwrap_or_else(|| self.config.config().last_profile.clone());
        let Some(profile) = self.profiles.get(&name) else {
            bail!("no profile named {name:?}");
        };

        let written = self
            .applist
            .regenerate(&profile.games)
            .with_context(|| format!("failed to write AppList for {name}"))?;

        let mut config = self.config.scoped();
        config.last_profile = name.clone();
        config.commit()?;

        writeln!(out, "applied {name}: {written} entries in {}", self.applist.dir().display())?;
        Ok(())
    }
}

fn found(outcome: QueryOutcome) -> anyhow::Result<Vec<Game>> {
    Ok(outcome.into_result()?)
}

fn print_games(games: &[Game], out: &mut impl Write) -> anyhow::Result<()> {
    for game in games {
        let [id, name, kind] = game.to_row();
        writeln!(out, "{id:>10}  {kind:<4}  {name}")?;
    }
    Ok(())
}
