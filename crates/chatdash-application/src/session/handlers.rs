//! Handlers for accepted owner actions.
//!
//! Every storage capability call goes through [`guarded`], so a failing or
//! panicking accessor becomes an inline failure instead of ending the session.

use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chatdash_core::category::{CategoryDef, SettingValue};
use chatdash_core::render::SettingFailure;
use chatdash_core::{DashboardError, Result};
use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use super::model::DashboardSession;
use super::pending::PendingEdit;
use super::state::SessionState;

/// Reason shown when a required field arrives empty.
pub const REQUIRED_VALUE_MISSING: &str = "a value is required";

/// Awaits a capability call, turning a panic into a storage error.
pub(crate) async fn guarded<T, F>(target: &str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(DashboardError::storage(target, "storage call panicked")),
    }
}

/// Outcome of a form submission.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EditOutcome {
    pub saved: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl DashboardSession {
    /// Fetches every setting of a category into the cache.
    ///
    /// A failed fetch keeps the last known value (or `Unavailable`) and
    /// leaves the category unprimed so the next view retries.
    pub(crate) async fn refresh(&mut self, index: usize) -> Vec<SettingFailure> {
        let categories = Arc::clone(&self.categories);
        let Some(category) = categories.get(index) else {
            return Vec::new();
        };

        let mut values = Vec::with_capacity(category.settings.len());
        let mut failures = Vec::new();
        for (position, setting) in category.settings.iter().enumerate() {
            match guarded(&setting.name, setting.accessor.fetch()).await {
                Ok(raw) => values.push(SettingValue::from_fetched(raw)),
                Err(e) => {
                    tracing::warn!(
                        category = %category.name,
                        setting = %setting.name,
                        error = %e,
                        "[Dashboard] Failed to fetch setting value"
                    );
                    let previous = self
                        .cache
                        .get(index, position)
                        .cloned()
                        .unwrap_or(SettingValue::Unavailable);
                    values.push(previous);
                    failures.push(SettingFailure::new(
                        &setting.name,
                        format!("could not load current value: {}", e.reason()),
                    ));
                }
            }
        }
        self.cache.store(index, values, failures.is_empty());
        failures
    }

    /// Selects a category, fetching its values unless a primed snapshot can
    /// be shown.
    pub(crate) async fn switch_category(&mut self, index: usize, refetch: bool) {
        self.discard_pending();
        self.failures.clear();
        if refetch || !self.cache.is_primed(index) {
            self.failures = self.refresh(index).await;
        }
        self.state = SessionState::CategoryView { category: index };
    }

    /// Records a freshly opened edit form, replacing any earlier one.
    pub(crate) fn begin_edit(&mut self, pending: PendingEdit) {
        self.failures.clear();
        self.state = SessionState::EditOpen {
            category: pending.category,
        };
        self.pending = Some(pending);
    }

    /// Applies a submitted form, one setting at a time in declaration order.
    ///
    /// Each submitted value is compared with a fresh read of the setting (or
    /// the cached value when that read fails) and saved only if it differs.
    /// A blank value clears an optional setting; a blank required value is
    /// reported and not saved.
    /// Once `shutdown` is cancelled no further save is started.
    pub(crate) async fn apply_edit(
        &mut self,
        pending: PendingEdit,
        values: &BTreeMap<String, String>,
        shutdown: &CancellationToken,
    ) -> EditOutcome {
        let index = pending.category;
        let categories = Arc::clone(&self.categories);
        let Some(category) = categories.get(index) else {
            return EditOutcome::default();
        };

        let mut outcome = EditOutcome::default();
        let mut failures = Vec::new();
        for (position, setting) in category.settings.iter().enumerate() {
            let submitted = values.get(&setting.name).map(String::as_str).unwrap_or("");
            if submitted.is_empty() && setting.required {
                failures.push(SettingFailure::new(&setting.name, REQUIRED_VALUE_MISSING));
                outcome.failed += 1;
                continue;
            }
            if shutdown.is_cancelled() {
                tracing::debug!(
                    category = %category.name,
                    "[Dashboard] Session closing, skipping remaining saves"
                );
                break;
            }

            let baseline = self.baseline(category, index, position).await;
            if baseline.matches(submitted) {
                outcome.unchanged += 1;
                continue;
            }

            match guarded(&setting.name, setting.accessor.save(submitted)).await {
                Ok(()) => {
                    tracing::info!(
                        category = %category.name,
                        setting = %setting.name,
                        "[Dashboard] Setting saved"
                    );
                    outcome.saved += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        category = %category.name,
                        setting = %setting.name,
                        error = %e,
                        "[Dashboard] Failed to save setting"
                    );
                    failures.push(SettingFailure::new(&setting.name, e.reason()));
                    outcome.failed += 1;
                }
            }
        }

        self.stats.saves_applied += outcome.saved;
        self.stats.save_failures += outcome.failed;
        if !shutdown.is_cancelled() {
            failures.extend(self.refresh(index).await);
        }
        self.pending = None;
        self.state = SessionState::CategoryView { category: index };
        self.failures = failures;
        outcome
    }

    async fn baseline(&self, category: &CategoryDef, index: usize, position: usize) -> SettingValue {
        let setting = &category.settings[position];
        match guarded(&setting.name, setting.accessor.fetch()).await {
            Ok(raw) => SettingValue::from_fetched(raw),
            Err(e) => {
                tracing::debug!(
                    setting = %setting.name,
                    error = %e,
                    "[Dashboard] Baseline fetch failed, comparing against cached value"
                );
                self.cache
                    .get(index, position)
                    .cloned()
                    .unwrap_or(SettingValue::Unavailable)
            }
        }
    }

    /// Restores a category's defaults and re-reads its values.
    pub(crate) async fn reset_category(&mut self, index: usize, shutdown: &CancellationToken) {
        self.discard_pending();
        let categories = Arc::clone(&self.categories);
        let Some(category) = categories.get(index) else {
            return;
        };

        let mut failures = Vec::new();
        if let Some(reset) = &category.reset {
            match guarded(&category.name, reset.reset()).await {
                Ok(()) => {
                    tracing::info!(category = %category.name, "[Dashboard] Category reset to defaults");
                }
                Err(e) => {
                    tracing::warn!(
                        category = %category.name,
                        error = %e,
                        "[Dashboard] Failed to reset category"
                    );
                    failures.push(SettingFailure::new(&category.name, e.reason()));
                }
            }
        }
        if !shutdown.is_cancelled() {
            failures.extend(self.refresh(index).await);
        }
        self.state = SessionState::CategoryView { category: index };
        self.failures = failures;
    }
}
