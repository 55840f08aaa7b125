use chatdash_core::category::SettingValue;
use chatdash_core::validation::ConfigValidator;
use chatdash_infrastructure::{DashboardSchema, TomlSettingsStore};
use tempfile::TempDir;

const SCHEMA: &str = r##"
[dashboard]
app_name = "Modbot"

[[category]]
name = "Moderation"
description = "Moderation tools"
emoji = "🛡️"
resettable = true

[[category.setting]]
name = "LogChannel"
description = "Where moderation logs go"
type = "textinput"
required = true
default = "#mod-log"

[[category.setting]]
name = "Rules"
type = "textarea"
max_length = 2000
"##;

#[tokio::test]
async fn test_schema_file_drives_storage() {
    // Use temporary directory for test
    let temp_dir = TempDir::new().unwrap();
    let schema_path = temp_dir.path().join("dashboard.toml");
    std::fs::write(&schema_path, SCHEMA).unwrap();
    let store = TomlSettingsStore::new(temp_dir.path().join("settings.toml"));

    let schema = DashboardSchema::load(&schema_path).expect("Should load schema");
    let categories = schema.categories(&store).expect("Should build categories");
    ConfigValidator::validate(&categories, &schema.dashboard).expect("Schema should be valid");

    let moderation = &categories[0];
    let log_channel = &moderation.settings[0].accessor;
    let rules = &moderation.settings[1].accessor;

    // Nothing stored yet
    assert_eq!(
        SettingValue::from_fetched(log_channel.fetch().await.unwrap()),
        SettingValue::Unconfigured
    );

    log_channel.save("#audit").await.unwrap();
    rules.save("Be nice\nNo spam").await.unwrap();

    // A second store over the same file sees the values
    let reopened = TomlSettingsStore::new(store.path());
    assert_eq!(
        reopened.get("Moderation", "LogChannel").await.unwrap().as_deref(),
        Some("#audit")
    );
    assert_eq!(
        reopened.get("Moderation", "Rules").await.unwrap().as_deref(),
        Some("Be nice\nNo spam")
    );

    // Reset restores the declared default and clears the rest
    moderation.reset.as_ref().unwrap().reset().await.unwrap();
    assert_eq!(log_channel.fetch().await.unwrap().as_deref(), Some("#mod-log"));
    assert_eq!(rules.fetch().await.unwrap(), None);
}

#[test]
fn test_invalid_schema_reports_first_violation() {
    let temp_dir = TempDir::new().unwrap();
    let store = TomlSettingsStore::new(temp_dir.path().join("settings.toml"));
    let schema = DashboardSchema::from_toml_str(
        r#"
[[category]]
name = "Bad_Name"
description = "Underscores are reserved"

[[category.setting]]
name = "Value"
type = "textinput"
"#,
    )
    .unwrap();

    let categories = schema.categories(&store).unwrap();
    let err = ConfigValidator::validate(&categories, &schema.dashboard).unwrap_err();
    assert!(err.to_string().contains("Bad_Name"));
}
