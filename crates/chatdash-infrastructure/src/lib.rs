//! File-backed implementations for chatdash.
//!
//! - `storage`: `AtomicTomlFile`, crash-safe TOML documents
//! - `settings_store`: setting values in a TOML file, exposed as the
//!   `SettingAccessor` / `CategoryReset` capabilities
//! - `schema`: dashboard schema files
//! - `paths`: default file locations

pub mod paths;
pub mod schema;
pub mod settings_store;
pub mod storage;

pub use paths::{ChatdashPaths, PathError};
pub use schema::{CategorySchema, DashboardSchema, SettingSchema};
pub use settings_store::{SettingsDocument, TomlCategoryReset, TomlSettingAccessor, TomlSettingsStore};
pub use storage::{AtomicTomlError, AtomicTomlFile};
