//! Display snapshots of setting values.

use serde::{Deserialize, Serialize};

/// Maximum characters of a value shown in the "Currently" line.
pub const DISPLAY_VALUE_LIMIT: usize = 100;

/// The last known value of a setting, as shown to the user.
///
/// This is derived from a `fetch` result and never written back into the
/// setting definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SettingValue {
    /// The setting holds a non-empty value.
    Configured(String),
    /// The setting has no value (absent or empty).
    Unconfigured,
    /// The value could not be fetched and nothing was cached before.
    Unavailable,
}

impl SettingValue {
    /// Builds a snapshot from a raw `fetch` result.
    ///
    /// Empty strings count as unconfigured.
    pub fn from_fetched(raw: Option<String>) -> Self {
        match raw {
            Some(value) if !value.is_empty() => Self::Configured(value),
            _ => Self::Unconfigured,
        }
    }

    /// Returns the stored value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Configured(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a submitted string is equal to this snapshot.
    ///
    /// An empty submission matches an unconfigured setting.
    pub fn matches(&self, submitted: &str) -> bool {
        match self {
            Self::Configured(value) => value == submitted,
            Self::Unconfigured => submitted.is_empty(),
            Self::Unavailable => false,
        }
    }

    /// Single-line text for the "Currently" line of a category view.
    ///
    /// Newlines become spaces and values longer than
    /// [`DISPLAY_VALUE_LIMIT`] characters are cut with a trailing `...`.
    pub fn display_text(&self) -> String {
        match self {
            Self::Configured(value) => {
                let flat = value.replace(['\r', '\n'], " ");
                truncate_chars(&flat, DISPLAY_VALUE_LIMIT, DISPLAY_VALUE_LIMIT)
            }
            Self::Unconfigured => "Unconfigured".to_string(),
            Self::Unavailable => "Unavailable".to_string(),
        }
    }
}

/// Truncates `text` to `keep` characters plus `...` when it has more than
/// `limit` characters.
pub fn truncate_chars(text: &str, limit: usize, keep: usize) -> String {
    if text.chars().count() > limit {
        let mut cut: String = text.chars().take(keep).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}
