//! Opening a dashboard and driving its session loop.
//!
//! One spawned task owns each [`DashboardSession`]. It waits on three
//! things at once: the next inbound event, the idle deadline and the
//! pending form's expiry. Events are handled strictly one after another;
//! while a handler runs, only the idle deadline and an explicit close can
//! interrupt it.

use std::sync::Arc;

use chatdash_core::category::CategoryDef;
use chatdash_core::config::DashboardConfig;
use chatdash_core::event::{ActorId, InteractionEvent};
use chatdash_core::render::{
    CategoryRenderer, DashboardView, DefaultCategoryRenderer, DefaultFormBuilder, FormBuilder,
    SettingFailure,
};
use chatdash_core::transport::Transport;
use chatdash_core::validation::ConfigValidator;
use chatdash_core::Result;
use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use super::handle::{SessionHandle, SessionReport};
use super::model::{Action, DashboardSession, Routing};
use super::pending::PendingEdit;
use super::state::{CloseReason, SessionState};

/// Builder for a dashboard session.
///
/// # Example
///
/// ```ignore
/// let handle = Dashboard::new(owner, categories)
///     .with_config(config)
///     .open(transport, events)
///     .await?;
/// let report = handle.join().await?;
/// ```
pub struct Dashboard {
    owner: ActorId,
    categories: Vec<CategoryDef>,
    config: DashboardConfig,
    renderer: Option<Arc<dyn CategoryRenderer>>,
    form_builder: Arc<dyn FormBuilder>,
}

impl Dashboard {
    pub fn new(owner: ActorId, categories: Vec<CategoryDef>) -> Self {
        Self {
            owner,
            categories,
            config: DashboardConfig::default(),
            renderer: None,
            form_builder: Arc::new(DefaultFormBuilder),
        }
    }

    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the stock renderer built from the config.
    pub fn with_renderer(mut self, renderer: Arc<dyn CategoryRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_form_builder(mut self, form_builder: Arc<dyn FormBuilder>) -> Self {
        self.form_builder = form_builder;
        self
    }

    /// Validates the schema, publishes the overview and starts the session.
    ///
    /// # Arguments
    ///
    /// * `transport` - Outbound side of the chat platform
    /// * `events` - Interactions on the published message, as the transport
    ///   receives them
    ///
    /// # Returns
    ///
    /// A handle to the running session.
    ///
    /// # Errors
    ///
    /// - `DashboardError::Config` when the categories or config are invalid;
    ///   nothing is published in that case
    /// - Any error of `Transport::publish`; the session is not started
    pub async fn open(
        self,
        transport: Arc<dyn Transport>,
        events: mpsc::Receiver<InteractionEvent>,
    ) -> Result<SessionHandle> {
        ConfigValidator::validate(&self.categories, &self.config)?;

        let renderer = self
            .renderer
            .unwrap_or_else(|| Arc::new(DefaultCategoryRenderer::new(&self.config)));
        let io = SessionIo {
            transport,
            renderer,
            form_builder: self.form_builder,
            config: self.config,
        };

        let id = Uuid::new_v4();
        let span = tracing::info_span!("dashboard", session = %id, owner = %self.owner);
        let categories: Arc<[CategoryDef]> = self.categories.into();
        let mut session = DashboardSession::new(
            self.owner.clone(),
            categories,
            Instant::now() + io.config.idle_timeout(),
        );

        async {
            if io.config.prefetch_on_open {
                for index in 0..session.categories.len() {
                    let failures = session.refresh(index).await;
                    if !failures.is_empty() {
                        tracing::warn!(
                            category = %session.categories[index].name,
                            failed = failures.len(),
                            "[Dashboard] Some values could not be prefetched"
                        );
                    }
                }
            }
            io.transport.publish(&io.view(&session)).await.map_err(|e| {
                tracing::error!(error = %e, "[Dashboard] Failed to publish dashboard");
                e
            })
        }
        .instrument(span.clone())
        .await?;

        session.idle_deadline = Instant::now() + io.config.idle_timeout();
        let (state_tx, state_rx) = watch::channel(session.state);
        let close_requested = CancellationToken::new();

        let controller = SessionController {
            id,
            opened_at: Utc::now(),
            session,
            io,
            events,
            close_requested: close_requested.clone(),
            shutdown: CancellationToken::new(),
            closing_rendered: false,
            state_tx,
        };
        let task = tokio::spawn(controller.run().instrument(span));

        Ok(SessionHandle::new(id, self.owner, close_requested, state_rx, task))
    }
}

/// Opens a dashboard with the stock renderer and form builder.
pub async fn open(
    owner: ActorId,
    categories: Vec<CategoryDef>,
    config: DashboardConfig,
    transport: Arc<dyn Transport>,
    events: mpsc::Receiver<InteractionEvent>,
) -> Result<SessionHandle> {
    Dashboard::new(owner, categories)
        .with_config(config)
        .open(transport, events)
        .await
}

/// Collaborators shared by every handler of a session.
struct SessionIo {
    transport: Arc<dyn Transport>,
    renderer: Arc<dyn CategoryRenderer>,
    form_builder: Arc<dyn FormBuilder>,
    config: DashboardConfig,
}

impl SessionIo {
    /// The view matching the session's current state.
    fn view(&self, session: &DashboardSession) -> DashboardView {
        let selector = self.renderer.selector(&session.categories);
        match session.state.selected() {
            Some(index) => {
                let category = &session.categories[index];
                let embed =
                    self.renderer
                        .render(category, &session.values_for(index), &session.failures);
                DashboardView::category(embed, self.renderer.controls(category), selector)
            }
            None => DashboardView::overview(self.renderer.overview(&session.categories), selector),
        }
    }

    async fn render(&self, session: &DashboardSession) -> Result<()> {
        self.transport.update(&self.view(session)).await
    }

    async fn acknowledge(&self, event: &InteractionEvent) {
        if let Err(e) = self.transport.acknowledge(event).await {
            tracing::warn!(event = %event.id, error = %e, "[Dashboard] Failed to acknowledge interaction");
        }
    }

    async fn close(&self) {
        let view = DashboardView::closed(self.renderer.closing());
        if let Err(e) = self.transport.close(&view).await {
            tracing::warn!(error = %e, "[Dashboard] Failed to render closing notice");
        }
    }
}

struct SessionController {
    id: Uuid,
    opened_at: chrono::DateTime<Utc>,
    session: DashboardSession,
    io: SessionIo,
    events: mpsc::Receiver<InteractionEvent>,
    /// Cancelled by `SessionHandle::close`
    close_requested: CancellationToken,
    /// Cancelled once closing begins; handlers stop starting saves
    shutdown: CancellationToken,
    closing_rendered: bool,
    state_tx: watch::Sender<SessionState>,
}

impl SessionController {
    async fn run(mut self) -> SessionReport {
        tracing::info!(
            categories = self.session.categories.len(),
            "[Dashboard] Session opened"
        );

        let reason = loop {
            let idle = time::sleep_until(self.session.idle_deadline);
            let form_expiry = self.session.pending.as_ref().map(|p| p.expires_at);

            tokio::select! {
                biased;
                _ = self.close_requested.cancelled() => break CloseReason::Explicit,
                _ = idle => break CloseReason::IdleTimeout,
                _ = sleep_until_some(form_expiry) => {
                    if let Err(reason) = self.expire_form().await {
                        break reason;
                    }
                }
                event = self.events.recv() => match event {
                    Some(event) => {
                        if let Err(reason) = self.process(event).await {
                            break reason;
                        }
                    }
                    None => break CloseReason::EventStreamEnded,
                },
            }
            self.state_tx.send_replace(self.session.state);
        };

        self.finish(reason).await
    }

    /// Handles one inbound event. `Err` carries the reason the session must close.
    async fn process(&mut self, event: InteractionEvent) -> std::result::Result<(), CloseReason> {
        let now = Instant::now();
        let action = match self.session.route(&event, now) {
            Routing::Foreign => {
                tracing::debug!(
                    actor = %event.actor,
                    kind = event.label(),
                    "[Dashboard] Ignoring interaction from another user"
                );
                self.session.stats.events_ignored += 1;
                self.io.acknowledge(&event).await;
                return Ok(());
            }
            Routing::Stale => {
                tracing::debug!(kind = event.label(), "[Dashboard] Dropping stale interaction");
                self.session.stats.events_ignored += 1;
                self.io.acknowledge(&event).await;
                return Ok(());
            }
            Routing::Accepted(action) => action,
        };

        self.session.idle_deadline = now + self.io.config.idle_timeout();
        self.session.stats.events_accepted += 1;
        tracing::debug!(kind = event.label(), "[Dashboard] Handling interaction");
        if !matches!(action, Action::OpenEdit(_)) {
            self.io.acknowledge(&event).await;
        }

        let deadline = self.session.idle_deadline;
        let work = dispatch(&mut self.session, &self.io, action, &event, &self.shutdown);
        tokio::pin!(work);

        let interrupted = tokio::select! {
            biased;
            result = &mut work => {
                return result.map_err(|e| {
                    tracing::error!(error = %e, "[Dashboard] Failed to update dashboard");
                    CloseReason::TransportFailure
                });
            }
            _ = time::sleep_until(deadline) => CloseReason::IdleTimeout,
            _ = self.close_requested.cancelled() => CloseReason::Explicit,
        };

        tracing::info!(
            reason = %interrupted,
            kind = event.label(),
            "[Dashboard] Closing while an interaction is still being handled"
        );
        self.shutdown.cancel();
        self.io.close().await;
        self.closing_rendered = true;
        if let Err(e) = work.await {
            tracing::debug!(error = %e, "[Dashboard] Interrupted handler failed");
        }
        Err(interrupted)
    }

    async fn expire_form(&mut self) -> std::result::Result<(), CloseReason> {
        if let Some(pending) = &self.session.pending {
            tracing::info!(form = %pending.correlation, "[Dashboard] Edit form expired");
        }
        self.session.discard_pending();
        self.io.render(&self.session).await.map_err(|e| {
            tracing::error!(error = %e, "[Dashboard] Failed to update dashboard");
            CloseReason::TransportFailure
        })
    }

    async fn finish(mut self, reason: CloseReason) -> SessionReport {
        self.shutdown.cancel();
        self.events.close();
        self.session.pending = None;
        self.session.state = SessionState::Closed { reason };
        if !self.closing_rendered {
            self.io.close().await;
            self.closing_rendered = true;
        }
        self.state_tx.send_replace(self.session.state);

        let stats = self.session.stats;
        tracing::info!(
            reason = %reason,
            accepted = stats.events_accepted,
            ignored = stats.events_ignored,
            saves = stats.saves_applied,
            "[Dashboard] Session closed"
        );

        SessionReport {
            session_id: self.id,
            owner: self.session.owner,
            reason,
            opened_at: self.opened_at,
            closed_at: Utc::now(),
            events_accepted: stats.events_accepted,
            events_ignored: stats.events_ignored,
            saves_applied: stats.saves_applied,
            save_failures: stats.save_failures,
        }
    }
}

/// Runs one accepted action and renders its result.
///
/// Nothing is rendered once `shutdown` is cancelled.
async fn dispatch(
    session: &mut DashboardSession,
    io: &SessionIo,
    action: Action,
    trigger: &InteractionEvent,
    shutdown: &CancellationToken,
) -> Result<()> {
    match action {
        Action::Switch(index) => {
            session
                .switch_category(index, io.config.refetch_on_switch)
                .await;
        }
        Action::OpenEdit(index) => {
            let categories = Arc::clone(&session.categories);
            let category = &categories[index];
            let pending = PendingEdit::new(index, &category.name, io.config.form_timeout());
            let form = io.form_builder.build(
                category,
                &session.values_for(index),
                pending.correlation.clone(),
            );
            match io.transport.open_form(trigger, &form).await {
                Ok(()) => {
                    tracing::debug!(form = %pending.correlation, "[Dashboard] Edit form opened");
                    session.begin_edit(pending);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "[Dashboard] Failed to open edit form");
                    session.discard_pending();
                    session.failures = vec![SettingFailure::new(
                        &category.name,
                        format!("could not open the edit form: {}", e.reason()),
                    )];
                }
            }
        }
        Action::Submit { pending, values } => {
            let outcome = session.apply_edit(pending, &values, shutdown).await;
            tracing::debug!(
                saved = outcome.saved,
                unchanged = outcome.unchanged,
                failed = outcome.failed,
                "[Dashboard] Edit applied"
            );
        }
        Action::Dismiss(pending) => {
            tracing::debug!(form = %pending.correlation, "[Dashboard] Edit form dismissed");
            session.discard_pending();
            return Ok(());
        }
        Action::Reset(index) => session.reset_category(index, shutdown).await,
    }

    if shutdown.is_cancelled() {
        return Ok(());
    }
    io.render(session).await
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
