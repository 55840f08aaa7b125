//! Session state types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a dashboard session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// No owner interaction within the idle window
    IdleTimeout,
    /// `SessionHandle::close` was called
    Explicit,
    /// The transport could no longer update the dashboard message
    TransportFailure,
    /// The transport dropped its event sender
    EventStreamEnded,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdleTimeout => write!(f, "idle timeout"),
            Self::Explicit => write!(f, "closed"),
            Self::TransportFailure => write!(f, "transport failure"),
            Self::EventStreamEnded => write!(f, "event stream ended"),
        }
    }
}

/// Where a dashboard currently is in its lifecycle.
///
/// Category positions index into the session's category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionState {
    /// The welcome page; no category selected yet.
    Overview,
    /// A category page is shown.
    CategoryView { category: usize },
    /// An edit form is open for the selected category.
    EditOpen { category: usize },
    /// Terminal state.
    Closed { reason: CloseReason },
}

impl SessionState {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    /// The selected category, if any.
    pub fn selected(&self) -> Option<usize> {
        match self {
            Self::CategoryView { category } | Self::EditOpen { category } => Some(*category),
            Self::Overview | Self::Closed { .. } => None,
        }
    }
}
