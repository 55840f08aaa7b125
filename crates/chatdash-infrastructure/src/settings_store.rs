//! TOML-file-backed setting values.
//!
//! Values live in a single document:
//!
//! ```toml
//! [values.General]
//! Prefix = "!"
//!
//! [values.Logs]
//! Channel = "#mod-log"
//! ```
//!
//! A setting missing from its table is unconfigured.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chatdash_core::category::{CategoryReset, SettingAccessor};
use chatdash_core::{DashboardError, Result};
use serde::{Deserialize, Serialize};

use crate::storage::{AtomicTomlError, AtomicTomlFile};

/// On-disk shape of the settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDocument {
    #[serde(default)]
    pub values: BTreeMap<String, BTreeMap<String, String>>,
}

/// Shared handle to a settings file.
///
/// Blocking file I/O runs on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    file: Arc<AtomicTomlFile<SettingsDocument>>,
}

impl TomlSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Reads one value.
    ///
    /// # Returns
    ///
    /// `None` when the setting has never been stored.
    pub async fn get(&self, category: &str, setting: &str) -> Result<Option<String>> {
        let category = category.to_string();
        let setting = setting.to_string();
        self.blocking(move |file| {
            let document = file.load()?.unwrap_or_default();
            Ok(document
                .values
                .get(&category)
                .and_then(|values| values.get(&setting))
                .cloned())
        })
        .await
    }

    /// Stores one value, creating the file if needed.
    pub async fn set(&self, category: &str, setting: &str, value: &str) -> Result<()> {
        let category = category.to_string();
        let setting = setting.to_string();
        let value = value.to_string();
        self.blocking(move |file| {
            file.update(SettingsDocument::default(), |document| {
                document
                    .values
                    .entry(category)
                    .or_default()
                    .insert(setting, value);
                Ok(())
            })
        })
        .await
    }

    /// Replaces every value of a category with `defaults`.
    ///
    /// Settings whose default is `None` become unconfigured.
    pub async fn restore(
        &self,
        category: &str,
        defaults: BTreeMap<String, Option<String>>,
    ) -> Result<()> {
        let category = category.to_string();
        self.blocking(move |file| {
            file.update(SettingsDocument::default(), |document| {
                let values: BTreeMap<String, String> = defaults
                    .into_iter()
                    .filter_map(|(setting, value)| value.map(|v| (setting, v)))
                    .collect();
                if values.is_empty() {
                    document.values.remove(&category);
                } else {
                    document.values.insert(category, values);
                }
                Ok(())
            })
        })
        .await
    }

    /// The fetch/save capability for one setting.
    pub fn accessor(&self, category: &str, setting: &str) -> TomlSettingAccessor {
        TomlSettingAccessor {
            store: self.clone(),
            category: category.to_string(),
            setting: setting.to_string(),
        }
    }

    /// The reset capability for one category.
    pub fn reset_for(
        &self,
        category: &str,
        defaults: BTreeMap<String, Option<String>>,
    ) -> TomlCategoryReset {
        TomlCategoryReset {
            store: self.clone(),
            category: category.to_string(),
            defaults,
        }
    }

    async fn blocking<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&AtomicTomlFile<SettingsDocument>) -> std::result::Result<R, AtomicTomlError>
            + Send
            + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| DashboardError::internal(format!("settings I/O task failed: {e}")))?
            .map_err(DashboardError::from)
    }
}

/// Reads and writes one setting of a [`TomlSettingsStore`].
#[derive(Debug, Clone)]
pub struct TomlSettingAccessor {
    store: TomlSettingsStore,
    category: String,
    setting: String,
}

#[async_trait]
impl SettingAccessor for TomlSettingAccessor {
    async fn fetch(&self) -> Result<Option<String>> {
        self.store.get(&self.category, &self.setting).await
    }

    async fn save(&self, value: &str) -> Result<()> {
        tracing::debug!(
            category = %self.category,
            setting = %self.setting,
            "[Storage] Writing setting value"
        );
        self.store
            .set(&self.category, &self.setting, value)
            .await
            .map_err(|e| DashboardError::storage(&self.setting, e.to_string()))
    }
}

/// Restores the schema defaults of one category.
#[derive(Debug, Clone)]
pub struct TomlCategoryReset {
    store: TomlSettingsStore,
    category: String,
    defaults: BTreeMap<String, Option<String>>,
}

#[async_trait]
impl CategoryReset for TomlCategoryReset {
    async fn reset(&self) -> Result<()> {
        tracing::info!(category = %self.category, "[Storage] Restoring category defaults");
        self.store
            .restore(&self.category, self.defaults.clone())
            .await
            .map_err(|e| DashboardError::storage(&self.category, e.to_string()))
    }
}
