use crate::category::{CategoryDef, SettingValue};
use crate::config::{DashboardConfig, EmbedTemplate, StartOptions};
use crate::event::ControlId;

use super::payload::{
    Button, ButtonStyle, ControlSet, Embed, EmbedField, SelectMenu, SelectOption, SettingFailure,
};

/// Placeholder of the category selector.
pub const SELECTOR_PLACEHOLDER: &str = "Select a Category to Configure...";

/// Title of the field listing failed updates.
pub const FAILURE_FIELD_TITLE: &str = "⚠️ Some changes were not applied";

/// Turns categories and setting snapshots into visual payloads.
///
/// Implementations must be pure: the same inputs always describe the same
/// view (apart from cosmetic randomness such as colors).
pub trait CategoryRenderer: Send + Sync {
    /// The welcome page shown when the dashboard opens.
    fn overview(&self, categories: &[CategoryDef]) -> Embed;

    /// The category selector, one option per category in the given order.
    fn selector(&self, categories: &[CategoryDef]) -> SelectMenu;

    /// A category page. `values` is aligned with `category.settings`.
    fn render(
        &self,
        category: &CategoryDef,
        values: &[SettingValue],
        failures: &[SettingFailure],
    ) -> Embed;

    /// The buttons of a category page.
    fn controls(&self, category: &CategoryDef) -> ControlSet;

    /// The notice shown once the dashboard has closed.
    fn closing(&self) -> Embed;
}

/// Renders the stock "<app> Settings Menu" look.
#[derive(Debug, Clone)]
pub struct DefaultCategoryRenderer {
    app_name: String,
    start: StartOptions,
    category_embed: Option<EmbedTemplate>,
    close_embed: Option<EmbedTemplate>,
    thumbnail_url: Option<String>,
    color: Option<u32>,
}

impl DefaultCategoryRenderer {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            start: config.start.clone(),
            category_embed: config.category_embed.clone(),
            close_embed: config.close_embed.clone(),
            thumbnail_url: config.thumbnail_url.clone(),
            color: config.color,
        }
    }

    fn embed(&self, template: Option<&EmbedTemplate>, title: String, description: String) -> Embed {
        let template = template.cloned().unwrap_or_default();
        Embed {
            title: template.title.unwrap_or(title),
            description: template.description.unwrap_or(description),
            thumbnail_url: template.thumbnail_url.or_else(|| self.thumbnail_url.clone()),
            color: template
                .color
                .or(self.color)
                .unwrap_or_else(|| rand::random::<u32>() & 0x00FF_FFFF),
            fields: Vec::new(),
        }
    }

    fn category_label(category: &CategoryDef) -> String {
        match &category.emoji {
            Some(emoji) => format!("{} {}", emoji, category.name),
            None => category.name.clone(),
        }
    }
}

impl CategoryRenderer for DefaultCategoryRenderer {
    fn overview(&self, categories: &[CategoryDef]) -> Embed {
        let app = &self.app_name;
        let mut embed = self.embed(
            self.start.embed.as_ref(),
            format!("{app} Settings Menu"),
            format!(
                "Welcome to the {app} Settings Menu!\nUse the selection menu below to find and configure {app}'s settings."
            ),
        );
        if self.start.show_categories_and_descriptions {
            embed.fields = categories
                .iter()
                .map(|category| EmbedField {
                    name: Self::category_label(category),
                    value: category.description.clone(),
                })
                .collect();
        }
        embed
    }

    fn selector(&self, categories: &[CategoryDef]) -> SelectMenu {
        SelectMenu {
            placeholder: SELECTOR_PLACEHOLDER.to_string(),
            options: categories
                .iter()
                .map(|category| SelectOption {
                    label: category.name.clone(),
                    description: category.description.clone(),
                    value: category.name.clone(),
                    emoji: category.emoji.clone(),
                })
                .collect(),
        }
    }

    fn render(
        &self,
        category: &CategoryDef,
        values: &[SettingValue],
        failures: &[SettingFailure],
    ) -> Embed {
        let mut embed = self.embed(
            self.category_embed.as_ref(),
            category.name.clone(),
            category.description.clone(),
        );

        for (index, setting) in category.settings.iter().enumerate() {
            let current = values.get(index).unwrap_or(&SettingValue::Unavailable);
            let currently = format!("Currently: **{}**", current.display_text());
            let value = match &setting.description {
                Some(description) if !description.is_empty() => {
                    format!("{description}\n{currently}")
                }
                _ => currently,
            };
            embed.fields.push(EmbedField {
                name: setting.name.clone(),
                value,
            });
        }

        if !failures.is_empty() {
            let lines: Vec<String> = failures
                .iter()
                .map(|f| format!("• {}: {}", f.setting, f.reason))
                .collect();
            embed.fields.push(EmbedField {
                name: FAILURE_FIELD_TITLE.to_string(),
                value: lines.join("\n"),
            });
        }
        embed
    }

    fn controls(&self, category: &CategoryDef) -> ControlSet {
        let mut buttons = vec![Button {
            id: ControlId::edit(&category.name),
            label: "Edit...".to_string(),
            emoji: Some("📝".to_string()),
            style: ButtonStyle::Success,
        }];
        if category.is_resettable() {
            buttons.push(Button {
                id: ControlId::reset(&category.name),
                label: "Reset to Default...".to_string(),
                emoji: Some("🗑".to_string()),
                style: ButtonStyle::Danger,
            });
        }
        ControlSet { buttons }
    }

    fn closing(&self) -> Embed {
        self.embed(
            self.close_embed.as_ref(),
            "Settings Menu Closed".to_string(),
            format!("The {} Settings Menu has been closed.", self.app_name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryReset, SettingAccessor, SettingDef, SettingKind};
    use crate::error::Result;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Fixed;

    #[async_trait]
    impl SettingAccessor for Fixed {
        async fn fetch(&self) -> Result<Option<String>> {
            Ok(None)
        }

        async fn save(&self, _value: &str) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl CategoryReset for Fixed {
        async fn reset(&self) -> Result<()> {
            Ok(())
        }
    }

    fn moderation() -> CategoryDef {
        CategoryDef::new("Moderation", "Moderation tools")
            .with_emoji("🛡️")
            .with_setting(
                SettingDef::new("LogChannel", SettingKind::SingleLine, Arc::new(Fixed))
                    .with_description("Where moderation logs go")
                    .required(true)
                    .with_max_length(100),
            )
            .with_setting(SettingDef::new("Rules", SettingKind::MultiLine, Arc::new(Fixed)))
    }

    fn renderer() -> DefaultCategoryRenderer {
        DefaultCategoryRenderer::new(&DashboardConfig::default().with_app_name("Modbot").with_color(0x123456))
    }

    #[test]
    fn test_render_one_field_per_setting() {
        let category = moderation();
        let values = vec![
            SettingValue::Unconfigured,
            SettingValue::Configured("Be nice".into()),
        ];
        let embed = renderer().render(&category, &values, &[]);

        assert_eq!(embed.title, "Moderation");
        assert_eq!(embed.fields.len(), category.settings.len());
        assert_eq!(embed.fields[0].name, "LogChannel");
        assert_eq!(
            embed.fields[0].value,
            "Where moderation logs go\nCurrently: **Unconfigured**"
        );
        assert_eq!(embed.fields[1].name, "Rules");
        assert_eq!(embed.fields[1].value, "Currently: **Be nice**");
        assert_eq!(embed.color, 0x123456);
    }

    #[test]
    fn test_render_appends_failures() {
        let category = moderation();
        let failures = vec![SettingFailure::new("Rules", "disk full")];
        let embed = renderer().render(
            &category,
            &[SettingValue::Unconfigured, SettingValue::Unconfigured],
            &failures,
        );
        assert_eq!(embed.fields.len(), 3);
        assert_eq!(embed.fields[2].name, FAILURE_FIELD_TITLE);
        assert_eq!(embed.fields[2].value, "• Rules: disk full");
    }

    #[test]
    fn test_controls_offer_reset_only_when_resettable() {
        let plain = moderation();
        let controls = renderer().controls(&plain);
        assert_eq!(controls.buttons.len(), 1);
        assert_eq!(controls.buttons[0].id, ControlId::edit("Moderation"));

        let resettable = moderation().with_reset(Arc::new(Fixed));
        let controls = renderer().controls(&resettable);
        assert_eq!(controls.buttons.len(), 2);
        assert_eq!(controls.buttons[1].label, "Reset to Default...");
        assert_eq!(controls.buttons[1].style, ButtonStyle::Danger);
    }

    #[test]
    fn test_selector_keeps_order() {
        let categories = vec![
            CategoryDef::new("Zeta", "z"),
            CategoryDef::new("Alpha", "a").with_emoji("🅰️"),
        ];
        let menu = renderer().selector(&categories);
        let labels: Vec<_> = menu.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha"]);
        assert_eq!(menu.options[1].emoji.as_deref(), Some("🅰️"));
        assert_eq!(menu.placeholder, SELECTOR_PLACEHOLDER);
    }

    #[test]
    fn test_overview_lists_categories_unless_disabled() {
        let categories = vec![moderation(), CategoryDef::new("Fun", "Games")];
        let embed = renderer().overview(&categories);
        assert_eq!(embed.title, "Modbot Settings Menu");
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[0].name, "🛡️ Moderation");
        assert_eq!(embed.fields[1].name, "Fun");

        let config = DashboardConfig::default().with_start(StartOptions {
            show_categories_and_descriptions: false,
            embed: Some(EmbedTemplate {
                title: Some("Custom".into()),
                ..EmbedTemplate::default()
            }),
        });
        let embed = DefaultCategoryRenderer::new(&config).overview(&categories);
        assert_eq!(embed.title, "Custom");
        assert!(embed.fields.is_empty());
    }

    #[test]
    fn test_closing_notice() {
        let embed = renderer().closing();
        assert_eq!(embed.title, "Settings Menu Closed");
        assert_eq!(embed.description, "The Modbot Settings Menu has been closed.");
    }
}
