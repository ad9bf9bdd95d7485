//! RON config loader
//!
//! Loads battle configuration from external RON files, with fallback to
//! hardcoded defaults.

use std::fs;
use std::path::{Path, PathBuf};

use super::config::{BattleConfig, ConfigError};

/// File name looked up in the working directory and the config dir
pub const CONFIG_FILE_NAME: &str = "skirmish.ron";

impl BattleConfig {
    /// Load and validate a config from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: BattleConfig = ron::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded battle config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from the first config file found on the search path
    pub fn discover() -> Self {
        match search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    /// Write this config as pretty RON for easy editing
    pub fn export(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Candidate config locations, most specific first
pub fn search_paths() -> Vec<PathBuf> {
    use directories::ProjectDirs;

    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(proj_dirs) = ProjectDirs::from("com", "skirmish", "Skirmish") {
        paths.push(proj_dirs.config_dir().join(CONFIG_FILE_NAME));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("skirmish-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_export_then_load() {
        let path = temp_path("roundtrip.ron");
        let config = BattleConfig::minimal();
        let result = config.export(&path);
        assert!(result.is_ok(), "Failed to export config: {:?}", result.err());

        let loaded = BattleConfig::load(&path).expect("exported config should load");
        assert_eq!(loaded, config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = temp_path("does-not-exist.ron");
        assert!(matches!(BattleConfig::load(&path), Err(ConfigError::Io(_))));
        assert_eq!(BattleConfig::load_or_default(&path), BattleConfig::default());
    }

    #[test]
    fn test_bad_file_falls_back() {
        let path = temp_path("garbage.ron");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "(selection_time_secs: ").unwrap();
        assert!(matches!(BattleConfig::load(&path), Err(ConfigError::Parse(_))));
        assert_eq!(BattleConfig::load_or_default(&path), BattleConfig::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_values_rejected_on_load() {
        let path = temp_path("invalid.ron");
        let mut config = BattleConfig::default();
        config.fumble_ceiling = 2.0;
        config.export(&path).unwrap();
        assert!(matches!(BattleConfig::load(&path), Err(ConfigError::Invalid(_))));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_search_paths_start_with_working_dir() {
        let paths = search_paths();
        assert_eq!(paths[0], PathBuf::from(CONFIG_FILE_NAME));
    }
}
