//! Test doubles shared by the session integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chatdash_application::{Dashboard, SessionHandle};
use chatdash_core::category::{CategoryDef, CategoryReset, SettingAccessor};
use chatdash_core::config::DashboardConfig;
use chatdash_core::event::{ActorId, CorrelationId, InteractionEvent};
use chatdash_core::render::{DashboardView, FormPayload};
use chatdash_core::transport::Transport;
use chatdash_core::{DashboardError, Result};
use tokio::sync::mpsc;

/// One recorded transport call.
#[derive(Debug, Clone)]
pub enum Call {
    Publish(DashboardView),
    Update(DashboardView),
    Ack(String),
    OpenForm(FormPayload),
    Close(DashboardView),
}

/// Transport that records every call on a channel.
pub struct MockTransport {
    calls: mpsc::UnboundedSender<Call>,
    pub fail_publish: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_open_form: AtomicBool,
}

impl MockTransport {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Call>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Arc::new(Self {
            calls: tx,
            fail_publish: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_open_form: AtomicBool::new(false),
        });
        (transport, rx)
    }

    fn record(&self, call: Call) {
        let _ = self.calls.send(call);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn publish(&self, view: &DashboardView) -> Result<()> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(DashboardError::transport("channel is gone"));
        }
        self.record(Call::Publish(view.clone()));
        Ok(())
    }

    async fn update(&self, view: &DashboardView) -> Result<()> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(DashboardError::transport("message was deleted"));
        }
        self.record(Call::Update(view.clone()));
        Ok(())
    }

    async fn acknowledge(&self, event: &InteractionEvent) -> Result<()> {
        self.record(Call::Ack(event.id.clone()));
        Ok(())
    }

    async fn open_form(&self, _trigger: &InteractionEvent, form: &FormPayload) -> Result<()> {
        if self.fail_open_form.load(Ordering::SeqCst) {
            return Err(DashboardError::transport("interaction expired"));
        }
        self.record(Call::OpenForm(form.clone()));
        Ok(())
    }

    async fn close(&self, view: &DashboardView) -> Result<()> {
        self.record(Call::Close(view.clone()));
        Ok(())
    }
}

/// An in-memory setting with optional delays and failures.
pub struct ScriptedSetting {
    name: String,
    value: Mutex<Option<String>>,
    saves: Mutex<Vec<String>>,
    fetches: AtomicUsize,
    fetch_delay: Duration,
    save_delay: Duration,
    save_error: Option<String>,
    journal: Option<Arc<Mutex<Vec<String>>>>,
}

impl ScriptedSetting {
    pub fn new(name: &str, value: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            value: Mutex::new(value.map(String::from)),
            saves: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            fetch_delay: Duration::ZERO,
            save_delay: Duration::ZERO,
            save_error: None,
            journal: None,
        }
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = delay;
        self
    }

    pub fn failing_save(mut self, reason: &str) -> Self {
        self.save_error = Some(reason.to_string());
        self
    }

    /// Logs `start:<name>` / `end:<name>` around every fetch.
    pub fn with_journal(mut self, journal: Arc<Mutex<Vec<String>>>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn saves(&self) -> Vec<String> {
        self.saves.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn value(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }

    pub fn set_value(&self, value: Option<&str>) {
        *self.value.lock().unwrap() = value.map(String::from);
    }

    fn log(&self, entry: &str) {
        if let Some(journal) = &self.journal {
            journal.lock().unwrap().push(format!("{entry}:{}", self.name));
        }
    }
}

#[async_trait]
impl SettingAccessor for ScriptedSetting {
    async fn fetch(&self) -> Result<Option<String>> {
        self.log("start");
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        self.log("end");
        Ok(self.value())
    }

    async fn save(&self, value: &str) -> Result<()> {
        if !self.save_delay.is_zero() {
            tokio::time::sleep(self.save_delay).await;
        }
        if let Some(reason) = &self.save_error {
            return Err(DashboardError::storage(&self.name, reason.clone()));
        }
        self.saves.lock().unwrap().push(value.to_string());
        self.set_value(Some(value));
        Ok(())
    }
}

/// Restores one setting to a default value.
pub struct ScriptedReset {
    target: Arc<ScriptedSetting>,
    default: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedReset {
    pub fn new(target: Arc<ScriptedSetting>, default: Option<&str>) -> Self {
        Self {
            target,
            default: default.map(String::from),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CategoryReset for ScriptedReset {
    async fn reset(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.target.set_value(self.default.as_deref());
        Ok(())
    }
}

pub fn owner() -> ActorId {
    ActorId::new("owner-1")
}

pub fn intruder() -> ActorId {
    ActorId::new("someone-else")
}

/// Config with a fixed color so views compare deterministically.
pub fn config() -> DashboardConfig {
    DashboardConfig::default()
        .with_app_name("Testbot")
        .with_color(0x5865F2)
}

/// A running session with both ends of its transport exposed.
pub struct Harness {
    pub handle: SessionHandle,
    pub events: mpsc::Sender<InteractionEvent>,
    pub calls: mpsc::UnboundedReceiver<Call>,
    pub transport: Arc<MockTransport>,
}

impl Harness {
    pub async fn open(categories: Vec<CategoryDef>, config: DashboardConfig) -> Self {
        let (transport, calls) = MockTransport::new();
        Self::open_with(categories, config, transport, calls).await
    }

    pub async fn open_with(
        categories: Vec<CategoryDef>,
        config: DashboardConfig,
        transport: Arc<MockTransport>,
        calls: mpsc::UnboundedReceiver<Call>,
    ) -> Self {
        let (events, rx) = mpsc::channel(16);
        let handle = Dashboard::new(owner(), categories)
            .with_config(config)
            .open(transport.clone(), rx)
            .await
            .expect("dashboard should open");
        let mut harness = Self {
            handle,
            events,
            calls,
            transport,
        };
        match harness.next().await {
            Call::Publish(_) => {}
            other => panic!("expected publish, got {other:?}"),
        }
        harness
    }

    pub async fn send(&self, event: InteractionEvent) {
        self.events.send(event).await.expect("session should be listening");
    }

    pub async fn next(&mut self) -> Call {
        self.calls.recv().await.expect("transport should record a call")
    }

    pub async fn expect_ack(&mut self) -> String {
        match self.next().await {
            Call::Ack(id) => id,
            other => panic!("expected ack, got {other:?}"),
        }
    }

    pub async fn expect_update(&mut self) -> DashboardView {
        match self.next().await {
            Call::Update(view) => view,
            other => panic!("expected update, got {other:?}"),
        }
    }

    pub async fn expect_form(&mut self) -> FormPayload {
        match self.next().await {
            Call::OpenForm(form) => form,
            other => panic!("expected form, got {other:?}"),
        }
    }

    pub async fn expect_close(&mut self) -> DashboardView {
        match self.next().await {
            Call::Close(view) => view,
            other => panic!("expected close, got {other:?}"),
        }
    }

    /// Selects a category and consumes its ack and update.
    pub async fn select(&mut self, category: &str) -> DashboardView {
        self.send(InteractionEvent::select(owner(), category)).await;
        self.expect_ack().await;
        self.expect_update().await
    }

    /// Presses the edit button of the selected category and returns the form.
    pub async fn open_form(&mut self, category: &str) -> FormPayload {
        self.send(InteractionEvent::press(
            owner(),
            chatdash_core::event::ControlId::edit(category),
        ))
        .await;
        self.expect_form().await
    }

    pub async fn submit(&mut self, correlation: CorrelationId, pairs: &[(&str, &str)]) {
        let values = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.send(InteractionEvent::submit(owner(), correlation, values))
            .await;
    }
}
