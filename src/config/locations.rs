//! Well-known folders under `<home>/Saved Games/MFDMF`

use std::path::PathBuf;

use crate::constants::dirs::{APP_DIR, CACHE, LOGS, MODULES, SAVED_GAMES, SETTINGS_FILE};

pub fn saved_games_dir() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(SAVED_GAMES);
    path
}

pub fn app_dir() -> PathBuf {
    saved_games_dir().join(APP_DIR)
}

pub fn cache_dir() -> PathBuf {
    app_dir().join(CACHE)
}

pub fn log_dir() -> PathBuf {
    app_dir().join(LOGS)
}

/// Default module root, used when the configuration leaves `modules` empty
pub fn modules_dir() -> PathBuf {
    app_dir().join(MODULES)
}

pub fn settings_file() -> PathBuf {
    app_dir().join(SETTINGS_FILE)
}
