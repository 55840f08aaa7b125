//! Platform-neutral descriptions of what a dashboard shows.
//!
//! Transports translate these into their own message/embed/component types.

use serde::{Deserialize, Serialize};

use crate::category::SettingKind;
use crate::event::{ControlId, CorrelationId};

/// A single titled field of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

/// A rich message card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// RGB color
    pub color: u32,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: ControlId,
    pub label: String,
    pub emoji: Option<String>,
    pub style: ButtonStyle,
}

/// The buttons shown under a category page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlSet {
    pub buttons: Vec<Button>,
}

impl ControlSet {
    pub fn find(&self, id: &ControlId) -> Option<&Button> {
        self.buttons.iter().find(|b| &b.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub description: String,
    /// Value reported back in a category-select event (the category name)
    pub value: String,
    pub emoji: Option<String>,
}

/// The category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectMenu {
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

/// One row of interactive components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentRow {
    Buttons(ControlSet),
    Select(SelectMenu),
}

/// Everything the dashboard message shows at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub embed: Embed,
    #[serde(default)]
    pub components: Vec<ComponentRow>,
}

impl DashboardView {
    /// The welcome page: embed plus the category selector.
    pub fn overview(embed: Embed, selector: SelectMenu) -> Self {
        Self {
            embed,
            components: vec![ComponentRow::Select(selector)],
        }
    }

    /// A category page: embed, its buttons, then the selector.
    pub fn category(embed: Embed, controls: ControlSet, selector: SelectMenu) -> Self {
        Self {
            embed,
            components: vec![ComponentRow::Buttons(controls), ComponentRow::Select(selector)],
        }
    }

    /// The final, non-interactive notice.
    pub fn closed(embed: Embed) -> Self {
        Self {
            embed,
            components: Vec::new(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        !self.components.is_empty()
    }

    pub fn selector(&self) -> Option<&SelectMenu> {
        self.components.iter().find_map(|row| match row {
            ComponentRow::Select(menu) => Some(menu),
            _ => None,
        })
    }

    pub fn controls(&self) -> Option<&ControlSet> {
        self.components.iter().find_map(|row| match row {
            ComponentRow::Buttons(controls) => Some(controls),
            _ => None,
        })
    }
}

/// A setting whose save/fetch/reset did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingFailure {
    /// Setting name, or the category name for a failed reset
    pub setting: String,
    pub reason: String,
}

impl SettingFailure {
    pub fn new(setting: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            setting: setting.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Short,
    Paragraph,
}

impl From<SettingKind> for TextStyle {
    fn from(kind: SettingKind) -> Self {
        match kind {
            SettingKind::SingleLine => TextStyle::Short,
            SettingKind::MultiLine => TextStyle::Paragraph,
        }
    }
}

/// One text input of an edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Setting the value is submitted for
    pub setting: String,
    pub label: String,
    pub style: TextStyle,
    pub placeholder: String,
    pub required: bool,
    pub min_length: Option<u16>,
    pub max_length: Option<u16>,
}

/// An edit form for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormPayload {
    pub title: String,
    pub correlation: CorrelationId,
    pub fields: Vec<FormField>,
}
