//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Well-known directory and file names under the user's home
pub mod dirs {
    /// Folder under the home directory that holds per-user game data
    pub const SAVED_GAMES: &str = "Saved Games";

    /// Application folder inside Saved Games
    pub const APP_DIR: &str = "MFDMF";

    /// Image cache folder inside the application folder
    pub const CACHE: &str = "Cache";

    /// Log folder inside the application folder
    pub const LOGS: &str = "Logs";

    /// Module definition folder inside the application folder
    pub const MODULES: &str = "Modules";

    /// Process configuration file inside the application folder
    pub const SETTINGS_FILE: &str = "appsettings.json";
}

/// Log file naming
pub mod logging {
    /// Prefix for rolling log files
    pub const FILE_PREFIX: &str = "status";

    /// Suffix for rolling log files
    pub const FILE_SUFFIX: &str = "log";

    /// Environment variable that selects the log level
    pub const LEVEL_ENV: &str = "LOG_LEVEL";
}

/// Values applied to displays and configurations when nothing more specific exists
pub mod defaults {
    /// Geometry and offset sentinel meaning "unspecified"
    pub const UNSET: i64 = -1;

    pub const OPACITY: f32 = 1.0;

    pub const ENABLED: bool = true;

    pub const CENTER: bool = false;
}

/// Module file discovery
pub mod modules {
    /// Only files with exactly this extension are parsed as module files
    pub const FILE_EXTENSION: &str = "json";
}

/// Process exit codes
pub mod exit {
    /// Display file could not be read
    pub const DISPLAY_IO: u8 = 1;

    /// Display file could not be parsed
    pub const DISPLAY_PARSE: u8 = 2;

    /// Module catalog failed to load
    pub const MODULES: u8 = 3;

    /// Process configuration failed to load
    pub const CONFIG: u8 = 4;

    /// Cache directory could not be cleared
    pub const CACHE: u8 = 5;
}
