fn main() {
    println!("Run `cargo test -p doc-compat` to execute document compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use glr_config::ConfigStore;
    use glr_model::{CURRENT_VERSION, Config, GameKind, Profile};
    use glr_profiles::ProfileManager;

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    fn copy_fixture(name: &str, dest: &Path) {
        fs::copy(fixtures_dir().join(name), dest)
            .unwrap_or_else(|e| panic!("failed to copy fixture {name}: {e}"));
    }

    /// Decodes a fixture, re-encodes it and compares the JSON values.
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));
        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  stored:  {fixture}\n  written: {reserialized}"
        );
    }

    // --- Profile documents ---

    #[test]
    fn fixture_profile_default() {
        roundtrip_test::<Profile>("profile_default.json");
    }

    #[test]
    fn fixture_profile_coop() {
        roundtrip_test::<Profile>("profile_coop.json");

        let profile = Profile::from_json(&load_fixture("profile_coop.json")).unwrap();
        let kinds: Vec<_> = profile.games.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, [GameKind::Game, GameKind::Dlc, GameKind::Game]);
    }

    #[test]
    fn fixture_profile_to_json_matches_document() {
        let fixture = load_fixture("profile_coop.json");
        let profile = Profile::from_json(&fixture).unwrap();
        assert_eq!(profile.to_json(), fixture);
    }

    #[test]
    fn fixture_profile_unknown_type_drops_only_that_game() {
        let profile = Profile::from_json(&load_fixture("profile_unknown_type.json")).unwrap();
        assert_eq!(profile.name, "mixed");
        let ids: Vec<_> = profile.games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["620"]);
    }

    #[test]
    fn fixture_profile_missing_games_is_rejected() {
        assert!(Profile::from_json(&load_fixture("profile_missing_games.json")).is_err());
    }

    #[test]
    fn profile_directory_skips_bad_documents() {
        let tmp = tempfile::tempdir().unwrap();
        copy_fixture("profile_coop.json", &tmp.path().join("coop.json"));
        copy_fixture("profile_default.json", &tmp.path().join("default.json"));
        copy_fixture("profile_unknown_type.json", &tmp.path().join("mixed.json"));
        copy_fixture("profile_missing_games.json", &tmp.path().join("broken.json"));

        let manager = ProfileManager::load_all(tmp.path()).unwrap();
        let names: Vec<_> = manager.names().collect();
        assert_eq!(names, ["coop", "default", "mixed"]);
        assert_eq!(manager.get("mixed").unwrap().games.len(), 1);
        assert_eq!(manager.skipped().len(), 1);
        assert!(manager.skipped()[0].path.ends_with("broken.json"));
    }

    // --- Config documents ---

    #[test]
    fn fixture_config_current() {
        roundtrip_test::<Config>("config_current.json");
    }

    #[test]
    fn fixture_config_legacy_is_upgraded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        copy_fixture("config_legacy.json", &path);

        let store = ConfigStore::load_from(&path);
        let config = store.config();
        assert_eq!(config.last_profile, "coop");
        assert!(!config.no_hook);
        assert!(config.check_update);
        // The legacy Steam path does not exist here, so nothing is migrated.
        assert!(config.greenluma_path.is_empty());

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let object = written.as_object().unwrap();
        assert_eq!(object.len(), 8);
        assert_eq!(written["version"], CURRENT_VERSION);
        assert!(written.get("dark_mode").is_none());
    }
}
