//! Dashboard sessions.
//!
//! A session is opened with [`Dashboard::open`] and runs on its own task
//! until it idles out, is closed through its [`SessionHandle`], or its
//! transport goes away.

mod cache;
mod controller;
mod handle;
mod handlers;
mod model;
mod pending;
mod registry;
mod state;

pub use cache::SettingValueCache;
pub use controller::{Dashboard, open};
pub use handle::{SessionHandle, SessionReport};
pub use handlers::REQUIRED_VALUE_MISSING;
pub use pending::PendingEdit;
pub use registry::SessionRegistry;
pub use state::{CloseReason, SessionState};
