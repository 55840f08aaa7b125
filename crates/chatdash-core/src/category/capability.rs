//! Caller-supplied storage capabilities.
//!
//! Setting values are owned and persisted by the caller. A dashboard only
//! ever holds transient snapshots obtained through these traits.

use async_trait::async_trait;

use crate::error::Result;

/// Reads and writes the live value of a single setting.
///
/// # Implementation Notes
///
/// - `fetch` returns `Ok(None)` (or an empty string) for an unconfigured setting.
/// - `save` must not be assumed idempotent; the dashboard only calls it when
///   the submitted value differs from the freshly fetched one.
#[async_trait]
pub trait SettingAccessor: Send + Sync {
    /// Returns the current value of the setting.
    async fn fetch(&self) -> Result<Option<String>>;

    /// Persists a new value for the setting.
    async fn save(&self, value: &str) -> Result<()>;
}

/// Restores every setting of a category to its default.
///
/// The dashboard treats the call as a single step; whether it is atomic is up
/// to the implementation.
#[async_trait]
pub trait CategoryReset: Send + Sync {
    async fn reset(&self) -> Result<()>;
}
