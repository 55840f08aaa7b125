//! Interaction events delivered by a transport.
//!
//! Every identifier is a typed value; nothing is recovered by splitting
//! strings, so category and setting names may contain any character the
//! schema allows.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a chat user.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlates a submitted form with the edit that opened it.
///
/// A fresh nonce is drawn for every opened form, so a submission for an older
/// form of the same category never matches the current one.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CorrelationId {
    /// Name of the category being edited
    pub category: String,
    pub nonce: Uuid,
}

impl CorrelationId {
    /// Creates a correlation id with a random nonce.
    pub fn generate(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            nonce: Uuid::new_v4(),
        }
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.category, self.nonce)
    }
}

/// The action behind a category button.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Edit,
    Reset,
}

/// Identifies a button rendered for a category.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ControlId {
    pub category: String,
    pub action: ControlAction,
}

impl ControlId {
    pub fn edit(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            action: ControlAction::Edit,
        }
    }

    pub fn reset(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            action: ControlAction::Reset,
        }
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionKind {
    /// A category was picked in the selector.
    CategorySelect { category: String },
    /// A category button was pressed.
    ButtonPress { control: ControlId },
    /// An edit form was submitted; values are keyed by setting name.
    FormSubmission {
        correlation: CorrelationId,
        #[serde(default)]
        values: BTreeMap<String, String>,
    },
    /// The user closed an edit form without submitting it.
    FormDismissed { correlation: CorrelationId },
}

/// An interaction received from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Transport-specific interaction id, used for acknowledgements
    pub id: String,
    pub actor: ActorId,
    #[serde(flatten)]
    pub kind: InteractionKind,
}

impl InteractionEvent {
    /// Creates an event with a generated interaction id.
    pub fn new(actor: ActorId, kind: InteractionKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            actor,
            kind,
        }
    }

    pub fn select(actor: ActorId, category: impl Into<String>) -> Self {
        Self::new(
            actor,
            InteractionKind::CategorySelect {
                category: category.into(),
            },
        )
    }

    pub fn press(actor: ActorId, control: ControlId) -> Self {
        Self::new(actor, InteractionKind::ButtonPress { control })
    }

    pub fn submit(
        actor: ActorId,
        correlation: CorrelationId,
        values: BTreeMap<String, String>,
    ) -> Self {
        Self::new(actor, InteractionKind::FormSubmission { correlation, values })
    }

    pub fn dismiss(actor: ActorId, correlation: CorrelationId) -> Self {
        Self::new(actor, InteractionKind::FormDismissed { correlation })
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match &self.kind {
            InteractionKind::CategorySelect { .. } => "category_select",
            InteractionKind::ButtonPress { control } => match control.action {
                ControlAction::Edit => "edit_button",
                ControlAction::Reset => "reset_button",
            },
            InteractionKind::FormSubmission { .. } => "form_submission",
            InteractionKind::FormDismissed { .. } => "form_dismissed",
        }
    }
}
