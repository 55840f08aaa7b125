//! Default locations of chatdash files.
//!
//! ```text
//! ~/.config/chatdash/
//! ├── dashboard.toml    # Dashboard schema
//! └── settings.toml     # Stored setting values
//! ```
//!
//! The base directory follows the platform convention resolved by `dirs`
//! (XDG on Linux, Application Support on macOS, AppData on Windows).

use std::path::PathBuf;

use thiserror::Error;

const APP_DIR: &str = "chatdash";
const SCHEMA_FILE: &str = "dashboard.toml";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Cannot determine the user configuration directory")]
    ConfigDirNotFound,
}

pub struct ChatdashPaths;

impl ChatdashPaths {
    /// Returns the chatdash configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/chatdash/`
    /// - `Err(PathError::ConfigDirNotFound)`: no home directory is known
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Path of the default dashboard schema.
    pub fn schema_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(SCHEMA_FILE))
    }

    /// Path of the default settings store.
    pub fn settings_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(SETTINGS_FILE))
    }
}
