//! Chat transport abstraction.
//!
//! A transport owns exactly one dashboard message. Inbound interactions are
//! not delivered through this trait; the transport pushes them into the
//! `mpsc` channel handed to the session when it opens.

use async_trait::async_trait;

use crate::error::Result;
use crate::event::InteractionEvent;
use crate::render::{DashboardView, FormPayload};

/// Outbound side of the chat platform for a single dashboard message.
///
/// # Implementation Notes
///
/// - `publish` is called once, before any other method.
/// - `update` edits the published message in place.
/// - `acknowledge` clears the client's pending indicator for an interaction
///   without changing the message. It is called for every event except edit
///   button presses, which are answered by `open_form`.
/// - `close` edits the message one last time with a view that has no
///   interactive components; it is called at most once.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the initial dashboard message.
    async fn publish(&self, view: &DashboardView) -> Result<()>;

    /// Replaces the dashboard message with a new view.
    async fn update(&self, view: &DashboardView) -> Result<()>;

    /// Acknowledges an interaction without a visible change.
    async fn acknowledge(&self, event: &InteractionEvent) -> Result<()>;

    /// Shows an edit form in response to `trigger`.
    async fn open_form(&self, trigger: &InteractionEvent, form: &FormPayload) -> Result<()>;

    /// Shows the closing notice and removes every interactive component.
    async fn close(&self, view: &DashboardView) -> Result<()>;
}
