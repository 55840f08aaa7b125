//! Dashboard configuration with named defaults.
//!
//! Every optional knob is resolved once, when the config is built or
//! deserialized, instead of being defaulted at each use site.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default inactivity window before a dashboard closes (2.5 minutes).
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 150_000;

/// Default lifetime of an open edit form (5 minutes).
pub const DEFAULT_FORM_TIMEOUT_MS: u64 = 300_000;

/// Default application name used in the generated embeds.
pub const DEFAULT_APP_NAME: &str = "Dashboard";

/// Overrides for the title/description of a generated embed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmbedTemplate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    /// RGB color; `None` picks a random color per render
    pub color: Option<u32>,
}

/// Options for the overview shown when the dashboard opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartOptions {
    /// List every category with its description on the overview
    #[serde(default = "default_true")]
    pub show_categories_and_descriptions: bool,
    /// Replaces the generated welcome embed
    #[serde(default)]
    pub embed: Option<EmbedTemplate>,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            show_categories_and_descriptions: true,
            embed: None,
        }
    }
}

/// Configuration for one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Name shown in the generated titles ("<app> Settings Menu")
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Inactivity window in milliseconds
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
    /// Edit form lifetime in milliseconds
    #[serde(default = "default_form_timeout_ms")]
    pub form_timeout_ms: u64,
    #[serde(default)]
    pub start: StartOptions,
    /// Shared template for every category page
    #[serde(default)]
    pub category_embed: Option<EmbedTemplate>,
    /// Template for the closing notice
    #[serde(default)]
    pub close_embed: Option<EmbedTemplate>,
    /// Thumbnail used by the generated embeds (e.g. the server icon)
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Fixed RGB color for generated embeds; random when unset
    #[serde(default)]
    pub color: Option<u32>,
    /// Fetch every category's values when the dashboard opens
    #[serde(default = "default_true")]
    pub prefetch_on_open: bool,
    /// Refetch values on every category switch instead of using the cache
    #[serde(default)]
    pub refetch_on_switch: bool,
}

fn default_true() -> bool {
    true
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_idle_timeout_ms() -> u64 {
    DEFAULT_IDLE_TIMEOUT_MS
}

fn default_form_timeout_ms() -> u64 {
    DEFAULT_FORM_TIMEOUT_MS
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            form_timeout_ms: DEFAULT_FORM_TIMEOUT_MS,
            start: StartOptions::default(),
            category_embed: None,
            close_embed: None,
            thumbnail_url: None,
            color: None,
            prefetch_on_open: true,
            refetch_on_switch: false,
        }
    }
}

impl DashboardConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn form_timeout(&self) -> Duration {
        Duration::from_millis(self.form_timeout_ms)
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_form_timeout(mut self, timeout: Duration) -> Self {
        self.form_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_start(mut self, start: StartOptions) -> Self {
        self.start = start;
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_prefetch_on_open(mut self, prefetch: bool) -> Self {
        self.prefetch_on_open = prefetch;
        self
    }

    pub fn with_refetch_on_switch(mut self, refetch: bool) -> Self {
        self.refetch_on_switch = refetch;
        self
    }
}
