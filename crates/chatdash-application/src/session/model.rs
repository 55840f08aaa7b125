//! The per-dashboard session aggregate and event routing.

use std::collections::BTreeMap;
use std::sync::Arc;

use chatdash_core::category::{CategoryDef, SettingValue};
use chatdash_core::event::{ActorId, ControlAction, InteractionEvent, InteractionKind};
use chatdash_core::render::SettingFailure;
use tokio::time::Instant;

use super::cache::SettingValueCache;
use super::pending::PendingEdit;
use super::state::SessionState;

/// What an accepted owner event asks the session to do.
#[derive(Debug)]
pub(crate) enum Action {
    Switch(usize),
    OpenEdit(usize),
    Submit {
        pending: PendingEdit,
        values: BTreeMap<String, String>,
    },
    Dismiss(PendingEdit),
    Reset(usize),
}

/// Result of routing one inbound event.
#[derive(Debug)]
pub(crate) enum Routing {
    /// From someone other than the owner.
    Foreign,
    /// From the owner but no longer applicable to the current state.
    Stale,
    Accepted(Action),
}

/// Everything one open dashboard knows about itself.
///
/// Owned exclusively by the session's run loop; nothing else mutates it.
pub(crate) struct DashboardSession {
    pub owner: ActorId,
    pub categories: Arc<[CategoryDef]>,
    pub state: SessionState,
    pub idle_deadline: Instant,
    pub cache: SettingValueCache,
    /// Present exactly while `state` is `EditOpen`
    pub pending: Option<PendingEdit>,
    /// Failures shown inline on the next render of the selected category
    pub failures: Vec<SettingFailure>,
    pub stats: SessionStats,
}

/// Counters reported when the session closes.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SessionStats {
    pub events_accepted: usize,
    pub events_ignored: usize,
    pub saves_applied: usize,
    pub save_failures: usize,
}

impl DashboardSession {
    pub fn new(owner: ActorId, categories: Arc<[CategoryDef]>, idle_deadline: Instant) -> Self {
        Self {
            owner,
            categories,
            state: SessionState::Overview,
            idle_deadline,
            cache: SettingValueCache::new(),
            pending: None,
            failures: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    /// Position of the category with exactly this name.
    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    /// Cached values of a category, padded with `Unavailable` when nothing
    /// has been fetched yet.
    pub fn values_for(&self, category: usize) -> Vec<SettingValue> {
        let count = self
            .categories
            .get(category)
            .map_or(0, |c| c.settings.len());
        match self.cache.values(category) {
            Some(values) => values.to_vec(),
            None => vec![SettingValue::Unavailable; count],
        }
    }

    /// Drops any open form and falls back to the category page.
    pub fn discard_pending(&mut self) {
        self.pending = None;
        if let SessionState::EditOpen { category } = self.state {
            self.state = SessionState::CategoryView { category };
        }
    }

    /// Decides what an inbound event means for the current state.
    ///
    /// Accepting a submission or dismissal consumes the pending edit, so a
    /// replayed event for the same form routes as stale.
    pub fn route(&mut self, event: &InteractionEvent, now: Instant) -> Routing {
        if event.actor != self.owner {
            return Routing::Foreign;
        }
        if self.state.is_closed() {
            return Routing::Stale;
        }

        let action = match &event.kind {
            InteractionKind::CategorySelect { category } => {
                self.category_index(category).map(Action::Switch)
            }
            InteractionKind::ButtonPress { control } => {
                self.state.selected().and_then(|selected| {
                    let category = &self.categories[selected];
                    if category.name != control.category {
                        return None;
                    }
                    match control.action {
                        ControlAction::Edit => Some(Action::OpenEdit(selected)),
                        ControlAction::Reset if category.is_resettable() => {
                            Some(Action::Reset(selected))
                        }
                        ControlAction::Reset => None,
                    }
                })
            }
            InteractionKind::FormSubmission {
                correlation,
                values,
            } => self
                .take_pending(|p| p.accepts(correlation, now))
                .map(|pending| Action::Submit {
                    pending,
                    values: values.clone(),
                }),
            InteractionKind::FormDismissed { correlation } => self
                .take_pending(|p| p.accepts(correlation, now))
                .map(Action::Dismiss),
        };

        match action {
            Some(action) => Routing::Accepted(action),
            None => Routing::Stale,
        }
    }

    fn take_pending(&mut self, accepts: impl FnOnce(&PendingEdit) -> bool) -> Option<PendingEdit> {
        if self.pending.as_ref().is_some_and(accepts) {
            self.pending.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatdash_core::Result;
    use chatdash_core::category::{CategoryReset, SettingAccessor, SettingDef, SettingKind};
    use chatdash_core::event::{ControlId, CorrelationId};
    use std::time::Duration;

    struct Noop;

    #[async_trait::async_trait]
    impl SettingAccessor for Noop {
        async fn fetch(&self) -> Result<Option<String>> {
            Ok(None)
        }

        async fn save(&self, _value: &str) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl CategoryReset for Noop {
        async fn reset(&self) -> Result<()> {
            Ok(())
        }
    }

    fn session() -> DashboardSession {
        let categories: Vec<CategoryDef> = vec![
            CategoryDef::new("General", "Basics")
                .with_setting(SettingDef::new("Prefix", SettingKind::SingleLine, Arc::new(Noop)))
                .with_reset(Arc::new(Noop)),
            CategoryDef::new("Logs", "Logging")
                .with_setting(SettingDef::new("Channel", SettingKind::SingleLine, Arc::new(Noop))),
        ];
        DashboardSession::new(ActorId::new("owner"), categories.into(), Instant::now())
    }

    fn owner() -> ActorId {
        ActorId::new("owner")
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreign_actor_is_never_routed() {
        let mut session = session();
        let event = InteractionEvent::select(ActorId::new("intruder"), "General");
        assert!(matches!(
            session.route(&event, Instant::now()),
            Routing::Foreign
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_buttons_need_matching_selected_category() {
        let mut session = session();
        let press = InteractionEvent::press(owner(), ControlId::edit("General"));
        assert!(matches!(session.route(&press, Instant::now()), Routing::Stale));

        session.state = SessionState::CategoryView { category: 1 };
        assert!(matches!(session.route(&press, Instant::now()), Routing::Stale));

        session.state = SessionState::CategoryView { category: 0 };
        assert!(matches!(
            session.route(&press, Instant::now()),
            Routing::Accepted(Action::OpenEdit(0))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_requires_capability() {
        let mut session = session();
        session.state = SessionState::CategoryView { category: 1 };
        let press = InteractionEvent::press(owner(), ControlId::reset("Logs"));
        assert!(matches!(session.route(&press, Instant::now()), Routing::Stale));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_consumes_pending_edit() {
        let mut session = session();
        let pending = PendingEdit::new(0, "General", Duration::from_secs(300));
        let correlation = pending.correlation.clone();
        session.state = SessionState::EditOpen { category: 0 };
        session.pending = Some(pending);

        let stale = InteractionEvent::submit(
            owner(),
            CorrelationId::generate("General"),
            BTreeMap::new(),
        );
        assert!(matches!(session.route(&stale, Instant::now()), Routing::Stale));
        assert!(session.pending.is_some());

        let submit = InteractionEvent::submit(owner(), correlation, BTreeMap::new());
        assert!(matches!(
            session.route(&submit, Instant::now()),
            Routing::Accepted(Action::Submit { .. })
        ));
        assert!(session.pending.is_none());
        assert!(matches!(session.route(&submit, Instant::now()), Routing::Stale));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_category_is_stale() {
        let mut session = session();
        let event = InteractionEvent::select(owner(), "general");
        assert!(matches!(session.route(&event, Instant::now()), Routing::Stale));
    }
}
