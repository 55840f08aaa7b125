//! Error types for chatdash.

use thiserror::Error;

use crate::validation::ValidationError;

/// A shared error type for every chatdash crate.
///
/// Storage and transport failures are recoverable inside a running session;
/// configuration failures are fatal and prevent a dashboard from opening.
#[derive(Error, Debug, Clone)]
pub enum DashboardError {
    /// The category/setting definitions or the dashboard config are malformed
    #[error("Invalid dashboard configuration: {0}")]
    Config(#[from] ValidationError),

    /// A setting capability (`fetch`, `save` or a category reset) failed
    #[error("Storage error for '{target}': {message}")]
    Storage { target: String, message: String },

    /// The chat transport rejected a send/edit/form request
    #[error("Transport error: {0}")]
    Transport(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// The session already reached its terminal state
    #[error("Dashboard session is closed")]
    SessionClosed,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Storage error for the given setting or category.
    pub fn storage(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Short, user-facing reason suitable for an inline render.
    ///
    /// Storage errors drop the target prefix because the render already
    /// places the reason next to the setting it belongs to.
    pub fn reason(&self) -> String {
        match self {
            Self::Storage { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DashboardError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DashboardError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error, used by callers whose capabilities are
/// written against anyhow.
impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, DashboardError>`.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_reason_omits_target() {
        let err = DashboardError::storage("LogChannel", "disk full");
        assert!(err.is_storage());
        assert_eq!(err.reason(), "disk full");
        assert_eq!(err.to_string(), "Storage error for 'LogChannel': disk full");
    }

    #[test]
    fn test_validation_error_converts_to_config() {
        let err: DashboardError = ValidationError::NoCategories.into();
        assert!(err.is_config());
        assert!(err.to_string().contains("No categories"));
    }

    #[test]
    fn test_io_error_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DashboardError = io.into();
        assert!(err.to_string().contains("NotFound"));
    }
}
