//! Static validation of dashboard definitions.
//!
//! A dashboard must never open with a malformed schema, so every rule is
//! checked up front and the first violation is reported with the offending
//! category/setting name.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::category::{CategoryDef, SettingDef};
use crate::config::{DashboardConfig, EmbedTemplate};

/// Upper bound on categories (the selector's option limit).
pub const MAX_CATEGORIES: usize = 25;
/// Upper bound on settings per category (the form's field limit).
pub const MAX_SETTINGS_PER_CATEGORY: usize = 5;
/// Maximum length of category and setting names.
pub const MAX_NAME_LENGTH: usize = 40;
/// Largest allowed `min_length` / `max_length`.
pub const MAX_INPUT_LENGTH: u16 = 4000;
/// Embed title limit of the chat platform.
pub const MAX_EMBED_TITLE: usize = 256;
/// Embed description limit of the chat platform.
pub const MAX_EMBED_DESCRIPTION: usize = 4096;

static PICTOGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\x{1F1E6}-\x{1F1FF}]").expect("valid pictograph regex")
});

/// Emoji in names: anything shown as emoji by default, the supplementary
/// pictograph blocks, and text pictographs forced into emoji form with VS16.
/// Text symbols such as `©`, `®` and `™` on their own are allowed.
static NAME_EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Emoji_Presentation}\x{1F000}-\x{1FAFF}]|\p{Extended_Pictographic}\x{FE0F}")
        .expect("valid name emoji regex")
});

static UNICODE_EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[\p{Extended_Pictographic}\x{1F1E6}-\x{1F1FF}\x{1F3FB}-\x{1F3FF}\x{FE0F}\x{200D}\x{20E3}#*0-9])+$",
    )
    .expect("valid emoji regex")
});

static CUSTOM_EMOJI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<a?:[A-Za-z0-9_]{2,32}:\d{17,20}>$").expect("valid custom emoji regex"));

/// Returns `true` when `text` contains a character rendered as emoji.
pub fn contains_emoji(text: &str) -> bool {
    NAME_EMOJI.is_match(text)
}

/// Returns `true` when `text` is a single emoji (sequence) or a custom
/// platform emoji such as `<:gear:123456789012345678>`.
pub fn is_valid_emoji(text: &str) -> bool {
    if CUSTOM_EMOJI.is_match(text) {
        return true;
    }
    UNICODE_EMOJI.is_match(text) && (PICTOGRAPH.is_match(text) || text.contains('\u{20E3}'))
}

/// A violated schema rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No categories have been provided")]
    NoCategories,

    #[error("Cannot have more than 25 categories (got {count})")]
    TooManyCategories { count: usize },

    #[error("Category #{index} is missing a name")]
    MissingCategoryName { index: usize },

    #[error("Category '{category}' has a name containing emoji")]
    CategoryNameHasEmoji { category: String },

    #[error("Category '{category}' has a name containing underscores, which are reserved")]
    CategoryNameHasUnderscore { category: String },

    #[error("Category '{category}' has a name longer than 40 characters")]
    CategoryNameTooLong { category: String },

    #[error("Category '{category}' is missing a description")]
    MissingCategoryDescription { category: String },

    #[error("Category '{category}' has an invalid emoji '{emoji}'")]
    InvalidCategoryEmoji { category: String, emoji: String },

    #[error("More than one category is named '{category}'")]
    DuplicateCategory { category: String },

    #[error("Category '{category}' has no settings")]
    NoSettings { category: String },

    #[error("Category '{category}' has more than 5 settings (got {count})")]
    TooManySettings { category: String, count: usize },

    #[error("A setting in category '{category}' is missing a name")]
    MissingSettingName { category: String },

    #[error("Setting '{category}/{setting}' has a name containing underscores, which are reserved")]
    SettingNameHasUnderscore { category: String, setting: String },

    #[error("Setting '{category}/{setting}' has a name longer than 40 characters")]
    SettingNameTooLong { category: String, setting: String },

    #[error("Setting '{category}/{setting}' has a description containing newlines")]
    SettingDescriptionHasNewline { category: String, setting: String },

    #[error("Setting '{category}/{setting}' has a {field} outside 1..=4000 (got {value})")]
    LengthOutOfRange {
        category: String,
        setting: String,
        field: &'static str,
        value: u16,
    },

    #[error("Setting '{category}/{setting}' has max_length {max} below min_length {min}")]
    MaxBelowMin {
        category: String,
        setting: String,
        min: u16,
        max: u16,
    },

    #[error("More than one setting in category '{category}' is named '{setting}'")]
    DuplicateSetting { category: String, setting: String },

    #[error("Setting '{category}/{setting}' is missing a setting type (expected textinput or textarea)")]
    MissingSettingKind { category: String, setting: String },

    #[error("Setting '{category}/{setting}' has an invalid type '{kind}' (expected textinput or textarea)")]
    InvalidSettingKind {
        category: String,
        setting: String,
        kind: String,
    },

    #[error("The {which} timeout must be greater than zero")]
    ZeroTimeout { which: &'static str },

    #[error("The {which} embed has a {field} longer than {limit} characters")]
    TemplateTooLong {
        which: &'static str,
        field: &'static str,
        limit: usize,
    },
}

/// Checks category definitions and dashboard options against the schema rules.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates everything a dashboard needs before it may open.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(
        categories: &[CategoryDef],
        config: &DashboardConfig,
    ) -> Result<(), ValidationError> {
        Self::validate_config(config)?;
        Self::validate_categories(categories)
    }

    /// Validates timeouts and embed templates.
    pub fn validate_config(config: &DashboardConfig) -> Result<(), ValidationError> {
        if config.idle_timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout { which: "idle" });
        }
        if config.form_timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout { which: "form" });
        }

        let templates = [
            ("start", config.start.embed.as_ref()),
            ("category", config.category_embed.as_ref()),
            ("close", config.close_embed.as_ref()),
        ];
        for (which, template) in templates {
            if let Some(template) = template {
                Self::validate_template(which, template)?;
            }
        }
        Ok(())
    }

    fn validate_template(which: &'static str, template: &EmbedTemplate) -> Result<(), ValidationError> {
        let too_long = |text: &Option<String>, limit: usize| {
            text.as_ref().is_some_and(|t| t.chars().count() > limit)
        };
        if too_long(&template.title, MAX_EMBED_TITLE) {
            return Err(ValidationError::TemplateTooLong {
                which,
                field: "title",
                limit: MAX_EMBED_TITLE,
            });
        }
        if too_long(&template.description, MAX_EMBED_DESCRIPTION) {
            return Err(ValidationError::TemplateTooLong {
                which,
                field: "description",
                limit: MAX_EMBED_DESCRIPTION,
            });
        }
        Ok(())
    }

    /// Validates category count, names, uniqueness and every setting.
    pub fn validate_categories(categories: &[CategoryDef]) -> Result<(), ValidationError> {
        if categories.is_empty() {
            return Err(ValidationError::NoCategories);
        }
        if categories.len() > MAX_CATEGORIES {
            return Err(ValidationError::TooManyCategories {
                count: categories.len(),
            });
        }

        let mut seen = HashSet::new();
        for (index, category) in categories.iter().enumerate() {
            Self::validate_category(index, category)?;
            if !seen.insert(category.name.to_lowercase()) {
                return Err(ValidationError::DuplicateCategory {
                    category: category.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_category(index: usize, category: &CategoryDef) -> Result<(), ValidationError> {
        let name = &category.name;
        if name.trim().is_empty() {
            return Err(ValidationError::MissingCategoryName { index });
        }
        if contains_emoji(name) {
            return Err(ValidationError::CategoryNameHasEmoji {
                category: name.clone(),
            });
        }
        if name.contains('_') {
            return Err(ValidationError::CategoryNameHasUnderscore {
                category: name.clone(),
            });
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::CategoryNameTooLong {
                category: name.clone(),
            });
        }
        if category.description.trim().is_empty() {
            return Err(ValidationError::MissingCategoryDescription {
                category: name.clone(),
            });
        }
        if let Some(emoji) = &category.emoji {
            if !is_valid_emoji(emoji) {
                return Err(ValidationError::InvalidCategoryEmoji {
                    category: name.clone(),
                    emoji: emoji.clone(),
                });
            }
        }

        if category.settings.is_empty() {
            return Err(ValidationError::NoSettings {
                category: name.clone(),
            });
        }
        if category.settings.len() > MAX_SETTINGS_PER_CATEGORY {
            return Err(ValidationError::TooManySettings {
                category: name.clone(),
                count: category.settings.len(),
            });
        }

        let mut seen = HashSet::new();
        for setting in &category.settings {
            Self::validate_setting(name, setting)?;
            if !seen.insert(setting.name.to_lowercase()) {
                return Err(ValidationError::DuplicateSetting {
                    category: name.clone(),
                    setting: setting.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_setting(category: &str, setting: &SettingDef) -> Result<(), ValidationError> {
        let name = &setting.name;
        if name.trim().is_empty() {
            return Err(ValidationError::MissingSettingName {
                category: category.to_string(),
            });
        }
        if name.contains('_') {
            return Err(ValidationError::SettingNameHasUnderscore {
                category: category.to_string(),
                setting: name.clone(),
            });
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::SettingNameTooLong {
                category: category.to_string(),
                setting: name.clone(),
            });
        }
        if setting
            .description
            .as_ref()
            .is_some_and(|d| d.contains('\n'))
        {
            return Err(ValidationError::SettingDescriptionHasNewline {
                category: category.to_string(),
                setting: name.clone(),
            });
        }

        let bounds = [("min_length", setting.min_length), ("max_length", setting.max_length)];
        for (field, bound) in bounds {
            if let Some(value) = bound {
                if value == 0 || value > MAX_INPUT_LENGTH {
                    return Err(ValidationError::LengthOutOfRange {
                        category: category.to_string(),
                        setting: name.clone(),
                        field,
                        value,
                    });
                }
            }
        }
        if let (Some(min), Some(max)) = (setting.min_length, setting.max_length) {
            if max < min {
                return Err(ValidationError::MaxBelowMin {
                    category: category.to_string(),
                    setting: name.clone(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}
