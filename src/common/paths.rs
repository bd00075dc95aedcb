//! Configuration and data paths
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/thumbprobe/` and `~/.local/share/thumbprobe/`
//! - macOS: `~/Library/Application Support/thumbprobe/`
//! - Windows: `%APPDATA%\thumbprobe\`

use std::path::PathBuf;

/// Name used for the configuration and data directories
const APP_NAME: &str = "thumbprobe";

/// File name of the append-only results log
pub const LOG_FILE_NAME: &str = "test-results.log";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the log directory
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join("logs"))
}

/// Default location of the results log
///
/// Falls back to the current directory when no home directory is known.
pub fn default_log_path() -> PathBuf {
    log_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}
