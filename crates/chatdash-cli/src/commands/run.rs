use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chatdash_application::{Dashboard, SessionRegistry, SessionReport};
use chatdash_core::event::{ActorId, InteractionEvent};
use chatdash_infrastructure::{DashboardSchema, TomlSettingsStore};
use colored::Colorize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::console::ConsoleTransport;
use crate::repl;

/// Opens a dashboard over the console transport and drives it from the REPL.
pub async fn run(schema: Option<PathBuf>, store: Option<PathBuf>, owner: String) -> Result<()> {
    let schema_path = super::schema_path(schema)?;
    let store_path = super::settings_path(store)?;

    let owner = ActorId::new(owner);
    let console = ConsoleTransport::new();
    let state = console.state();
    let (events_tx, events_rx) = mpsc::channel(32);
    let registry = SessionRegistry::new();

    open_dashboard(
        &registry,
        &schema_path,
        store_path,
        owner.clone(),
        console,
        events_rx,
    )
    .await?;

    let repl = tokio::task::spawn_blocking(move || repl::run(events_tx, owner, state));
    let outcome = repl.await.context("REPL thread panicked");

    for report in registry.shutdown().await {
        println!("{}", summary(&report).bright_green());
    }
    outcome?
}

/// Loads the schema, opens its dashboard and registers the session.
pub async fn open_dashboard(
    registry: &SessionRegistry,
    schema_path: &Path,
    store_path: PathBuf,
    owner: ActorId,
    console: ConsoleTransport,
    events: mpsc::Receiver<InteractionEvent>,
) -> Result<Uuid> {
    let schema = DashboardSchema::load(schema_path)
        .with_context(|| format!("Failed to load schema {}", schema_path.display()))?;
    let store = TomlSettingsStore::new(store_path);
    let categories = schema
        .categories(&store)
        .context("Failed to build dashboard categories")?;
    tracing::info!(
        schema = %schema_path.display(),
        store = %store.path().display(),
        categories = categories.len(),
        "[CLI] Opening dashboard"
    );

    let handle = Dashboard::new(owner, categories)
        .with_config(schema.dashboard)
        .open(Arc::new(console), events)
        .await
        .context("Failed to open dashboard")?;
    Ok(registry.insert(handle).await)
}

fn summary(report: &SessionReport) -> String {
    format!(
        "Dashboard closed ({}) after {}s: {} interactions, {} saves, {} failed",
        report.reason,
        report.duration().num_seconds(),
        report.events_accepted,
        report.saves_applied,
        report.save_failures
    )
}
