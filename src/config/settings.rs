//! Process configuration
//!
//! Loaded once from `appsettings.json` and passed by reference to the
//! display and module loaders. Path-valued fields are expanded and
//! normalized on load so consumers never see `$VAR` references or
//! mixed separators.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::locations;
use crate::error::{MfdError, Result};
use crate::paths::{expand_env, normalize_separators};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MfdConfig {
    /// JSON array of display regions
    pub display_configuration_file: String,

    /// Name of the module selected when none is given on the command line
    pub default_configuration: String,

    pub dcs_saved_games_path: String,

    pub save_cropped_images: bool,

    /// Root of the module definition tree; categories are relative to it
    pub modules: String,

    /// Base path (glob) that configuration image file names are resolved against
    pub file_path: String,

    pub use_cougar: bool,

    pub show_rulers: bool,

    pub ruler_size: i64,
}

impl MfdConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| MfdError::io(path, e))?;
        let mut config: MfdConfig =
            serde_json::from_str(&contents).map_err(|e| MfdError::parse(path, e))?;
        config.fixup_paths();

        info!(path = %path.display(), "Loaded configuration");
        debug!(config = ?config, "Resolved configuration paths");
        Ok(config)
    }

    /// Expand environment variables and normalize separators in path fields
    pub fn fixup_paths(&mut self) {
        for field in [
            &mut self.file_path,
            &mut self.dcs_saved_games_path,
            &mut self.display_configuration_file,
            &mut self.modules,
        ] {
            *field = normalize_separators(&expand_env(field));
        }
    }

    /// Module root, falling back to the default folder when unset
    pub fn modules_root(&self) -> PathBuf {
        if self.modules.is_empty() {
            locations::modules_dir()
        } else {
            PathBuf::from(&self.modules)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_settings(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("appsettings.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_reads_all_fields() {
        let dir = TempDir::new().unwrap();
        let path = write_settings(
            &dir,
            r#"{
                "displayConfigurationFile": "/cfg/displays.json",
                "defaultConfiguration": "F-18C",
                "dcsSavedGamesPath": "/games/DCS",
                "saveCroppedImages": true,
                "modules": "/cfg/modules",
                "filePath": "/cfg/images",
                "useCougar": true,
                "showRulers": true,
                "rulerSize": 40
            }"#,
        );

        let config = MfdConfig::load(&path).unwrap();
        assert_eq!(config.display_configuration_file, normalize_separators("/cfg/displays.json"));
        assert_eq!(config.default_configuration, "F-18C");
        assert_eq!(config.dcs_saved_games_path, normalize_separators("/games/DCS"));
        assert!(config.save_cropped_images);
        assert_eq!(config.modules, normalize_separators("/cfg/modules"));
        assert_eq!(config.file_path, normalize_separators("/cfg/images"));
        assert!(config.use_cougar);
        assert!(config.show_rulers);
        assert_eq!(config.ruler_size, 40);
    }

    #[test]
    fn test_load_missing_fields_default() {
        let dir = TempDir::new().unwrap();
        let path = write_settings(&dir, r#"{ "filePath": "/images" }"#);

        let config = MfdConfig::load(&path).unwrap();
        assert_eq!(config.file_path, normalize_separators("/images"));
        assert_eq!(config.ruler_size, 0);
        assert!(!config.show_rulers);
        assert!(config.modules.is_empty());
        assert_eq!(config.modules_root(), locations::modules_dir());
    }

    #[test]
    fn test_fixup_paths_normalizes_separators() {
        let mut config = MfdConfig {
            file_path: "C:\\Users/pilot\\images".to_string(),
            dcs_saved_games_path: "D:/DCS".to_string(),
            ..Default::default()
        };
        config.fixup_paths();

        assert_eq!(config.file_path, normalize_separators("C:/Users/pilot/images"));
        // Each path keeps its own value
        assert_eq!(config.dcs_saved_games_path, normalize_separators("D:/DCS"));
    }

    #[test]
    fn test_fixup_paths_expands_environment() {
        let home = std::env::var("HOME").unwrap_or_default();
        let mut config = MfdConfig {
            modules: "${HOME}/modules".to_string(),
            ..Default::default()
        };
        config.fixup_paths();

        assert_eq!(config.modules, normalize_separators(&format!("{home}/modules")));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = MfdConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, MfdError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_settings(&dir, "{ not json");
        assert!(MfdConfig::load(&path).unwrap_err().is_parse());
    }
}
