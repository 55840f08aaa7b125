//! Category and setting definitions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::capability::{CategoryReset, SettingAccessor};

/// The input style of a setting.
///
/// Parses case-insensitively from the schema names `textinput` and `textarea`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SettingKind {
    /// Single-line text input
    #[strum(serialize = "textinput")]
    #[serde(rename = "textinput")]
    SingleLine,
    /// Multi-line text area
    #[strum(serialize = "textarea")]
    #[serde(rename = "textarea")]
    MultiLine,
}

/// An editable setting.
///
/// The definition is immutable for the lifetime of a dashboard; the live value
/// is only reachable through the accessor.
#[derive(Clone)]
pub struct SettingDef {
    /// Setting name, unique (case-insensitively) within its category
    pub name: String,
    /// Optional single-line description
    pub description: Option<String>,
    pub kind: SettingKind,
    /// Minimum input length (1..=4000)
    pub min_length: Option<u16>,
    /// Maximum input length (1..=4000)
    pub max_length: Option<u16>,
    /// Whether the edit form requires a value
    pub required: bool,
    /// Storage capability for the live value
    pub accessor: Arc<dyn SettingAccessor>,
}

impl SettingDef {
    /// Creates an optional setting without description or length bounds.
    pub fn new(
        name: impl Into<String>,
        kind: SettingKind,
        accessor: Arc<dyn SettingAccessor>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            min_length: None,
            max_length: None,
            required: false,
            accessor,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_min_length(mut self, min_length: u16) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: u16) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

impl fmt::Debug for SettingDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingDef")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("kind", &self.kind)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// A group of related settings shown as one page of the dashboard.
#[derive(Clone)]
pub struct CategoryDef {
    /// Category name, unique (case-insensitively) across the dashboard
    pub name: String,
    pub description: String,
    /// Emoji shown next to the category in the selector
    pub emoji: Option<String>,
    /// The settings, in display order (1..=5)
    pub settings: Vec<SettingDef>,
    /// Optional "reset to default" capability
    pub reset: Option<Arc<dyn CategoryReset>>,
}

impl CategoryDef {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            emoji: None,
            settings: Vec::new(),
            reset: None,
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn with_setting(mut self, setting: SettingDef) -> Self {
        self.settings.push(setting);
        self
    }

    pub fn with_reset(mut self, reset: Arc<dyn CategoryReset>) -> Self {
        self.reset = Some(reset);
        self
    }

    /// Whether the category offers a "reset to default" control.
    pub fn is_resettable(&self) -> bool {
        self.reset.is_some()
    }

    /// Finds a setting by exact name.
    pub fn setting(&self, name: &str) -> Option<&SettingDef> {
        self.settings.iter().find(|s| s.name == name)
    }
}

impl fmt::Debug for CategoryDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryDef")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("emoji", &self.emoji)
            .field("settings", &self.settings)
            .field("resettable", &self.is_resettable())
            .finish()
    }
}
