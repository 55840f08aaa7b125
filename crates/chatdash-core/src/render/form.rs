use crate::category::{CategoryDef, SettingValue, truncate_chars};
use crate::event::CorrelationId;

use super::payload::{FormField, FormPayload};

/// Placeholders longer than this are truncated.
pub const PLACEHOLDER_LIMIT: usize = 100;
/// Characters kept from a truncated placeholder (before the `...`).
pub const PLACEHOLDER_KEEP: usize = 96;

/// Builds the edit form for a category.
pub trait FormBuilder: Send + Sync {
    /// `values` is aligned with `category.settings`.
    fn build(
        &self,
        category: &CategoryDef,
        values: &[SettingValue],
        correlation: CorrelationId,
    ) -> FormPayload;
}

/// One input per setting, labelled with the setting name and showing the
/// current value as placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormBuilder;

impl DefaultFormBuilder {
    fn placeholder(name: &str, value: Option<&SettingValue>) -> String {
        let text = match value.and_then(SettingValue::as_str) {
            Some(current) => current.to_string(),
            None => format!("Enter {name}..."),
        };
        truncate_chars(&text, PLACEHOLDER_LIMIT, PLACEHOLDER_KEEP)
    }
}

impl FormBuilder for DefaultFormBuilder {
    fn build(
        &self,
        category: &CategoryDef,
        values: &[SettingValue],
        correlation: CorrelationId,
    ) -> FormPayload {
        let fields = category
            .settings
            .iter()
            .enumerate()
            .map(|(index, setting)| FormField {
                setting: setting.name.clone(),
                label: setting.name.clone(),
                style: setting.kind.into(),
                placeholder: Self::placeholder(&setting.name, values.get(index)),
                required: setting.required,
                min_length: setting.min_length,
                max_length: setting.max_length,
            })
            .collect();

        FormPayload {
            title: category.name.clone(),
            correlation,
            fields,
        }
    }
}
