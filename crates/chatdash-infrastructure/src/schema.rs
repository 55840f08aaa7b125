//! Dashboard schema files.
//!
//! A schema file declares the dashboard options and its categories:
//!
//! ```toml
//! [dashboard]
//! app_name = "Modbot"
//! idle_timeout_ms = 150000
//!
//! [[category]]
//! name = "General"
//! description = "Basic bot settings"
//! emoji = "⚙️"
//! resettable = true
//!
//! [[category.setting]]
//! name = "Prefix"
//! description = "Command prefix"
//! type = "textinput"
//! max_length = 5
//! required = true
//! default = "!"
//! ```
//!
//! Loading only checks the TOML shape and setting types; the remaining
//! rules are enforced by `ConfigValidator` when the dashboard opens.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chatdash_core::category::{CategoryDef, SettingDef, SettingKind};
use chatdash_core::config::DashboardConfig;
use chatdash_core::validation::ValidationError;
use chatdash_core::{DashboardError, Result};
use serde::{Deserialize, Serialize};

use crate::settings_store::TomlSettingsStore;
use crate::storage::AtomicTomlFile;

/// One setting as written in a schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingSchema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `textinput` or `textarea`, case-insensitive
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub min_length: Option<u16>,
    #[serde(default)]
    pub max_length: Option<u16>,
    #[serde(default)]
    pub required: bool,
    /// Value restored by a category reset
    #[serde(default)]
    pub default: Option<String>,
}

/// One category as written in a schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySchema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub emoji: Option<String>,
    /// Whether the category offers "Reset to Default"
    #[serde(default)]
    pub resettable: bool,
    #[serde(default, rename = "setting")]
    pub settings: Vec<SettingSchema>,
}

impl CategorySchema {
    /// Schema defaults keyed by setting name.
    pub fn defaults(&self) -> BTreeMap<String, Option<String>> {
        self.settings
            .iter()
            .map(|s| (s.name.clone(), s.default.clone()))
            .collect()
    }
}

/// A parsed schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSchema {
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategorySchema>,
}

impl DashboardSchema {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads a schema file.
    ///
    /// # Errors
    ///
    /// - `DashboardError::NotFound` if the file is missing or blank
    /// - `DashboardError::Serialization` if it is not a valid schema document
    pub fn load(path: &Path) -> Result<Self> {
        let file = AtomicTomlFile::<Self>::new(path.to_path_buf());
        file.load()?
            .ok_or_else(|| DashboardError::not_found("schema file", path.display().to_string()))
    }

    /// Builds the category definitions, wiring every setting to `store`.
    ///
    /// # Errors
    ///
    /// `DashboardError::Config` with `ValidationError::MissingSettingKind`
    /// when a setting has no `type`, or `ValidationError::InvalidSettingKind`
    /// when it is neither `textinput` nor `textarea`.
    pub fn categories(&self, store: &TomlSettingsStore) -> Result<Vec<CategoryDef>> {
        self.categories
            .iter()
            .map(|category| Self::category(category, store))
            .collect()
    }

    fn category(schema: &CategorySchema, store: &TomlSettingsStore) -> Result<CategoryDef> {
        let mut category = CategoryDef::new(&schema.name, &schema.description);
        if let Some(emoji) = &schema.emoji {
            category = category.with_emoji(emoji);
        }

        for setting in &schema.settings {
            let kind = Self::kind(&schema.name, setting)?;

            let mut def = SettingDef::new(
                &setting.name,
                kind,
                Arc::new(store.accessor(&schema.name, &setting.name)),
            )
            .required(setting.required);
            if let Some(description) = &setting.description {
                def = def.with_description(description);
            }
            if let Some(min) = setting.min_length {
                def = def.with_min_length(min);
            }
            if let Some(max) = setting.max_length {
                def = def.with_max_length(max);
            }
            category = category.with_setting(def);
        }

        if schema.resettable {
            category = category.with_reset(Arc::new(store.reset_for(&schema.name, schema.defaults())));
        }
        Ok(category)
    }

    fn kind(category: &str, setting: &SettingSchema) -> std::result::Result<SettingKind, ValidationError> {
        let raw = setting
            .kind
            .as_deref()
            .ok_or_else(|| ValidationError::MissingSettingKind {
                category: category.to_string(),
                setting: setting.name.clone(),
            })?;
        raw.parse().map_err(|_| ValidationError::InvalidSettingKind {
            category: category.to_string(),
            setting: setting.name.clone(),
            kind: raw.to_string(),
        })
    }
}
