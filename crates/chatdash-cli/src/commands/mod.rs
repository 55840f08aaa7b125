pub mod run;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chatdash_infrastructure::{ChatdashPaths, PathError};

/// Uses `explicit` when given, otherwise the default location.
pub fn resolve_path(
    explicit: Option<PathBuf>,
    default: fn() -> std::result::Result<PathBuf, PathError>,
) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => default().context("Pass the path explicitly"),
    }
}

pub fn schema_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    resolve_path(explicit, ChatdashPaths::schema_file)
}

pub fn settings_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    resolve_path(explicit, ChatdashPaths::settings_file)
}
