use std::path::PathBuf;

use anyhow::{Context, Result};
use chatdash_core::validation::ConfigValidator;
use chatdash_infrastructure::{DashboardSchema, TomlSettingsStore};
use colored::Colorize;

/// Checks a schema file and prints the verdict.
///
/// # Returns
///
/// `true` when the schema is valid.
pub fn run(schema: Option<PathBuf>) -> Result<bool> {
    let path = super::schema_path(schema)?;
    let schema = DashboardSchema::load(&path)
        .with_context(|| format!("Failed to load schema {}", path.display()))?;

    // Capabilities are never called during validation; the store is not touched.
    let store = TomlSettingsStore::new(path.with_extension("values.toml"));
    let verdict = schema
        .categories(&store)
        .and_then(|categories| {
            ConfigValidator::validate(&categories, &schema.dashboard)?;
            Ok(categories.len())
        });

    match verdict {
        Ok(count) => {
            println!(
                "{} {} ({} categories)",
                "OK".bright_green().bold(),
                path.display(),
                count
            );
            Ok(true)
        }
        Err(e) => {
            println!("{} {}", "INVALID".bright_red().bold(), e);
            Ok(false)
        }
    }
}
