//! Session orchestration for chatdash dashboards.
//!
//! Ties the domain model of `chatdash-core` together: validates a schema,
//! publishes the dashboard through a `Transport`, and routes the owner's
//! interactions to fetches, saves and resets until the session closes.

pub mod session;

pub use session::{
    CloseReason, Dashboard, SessionHandle, SessionRegistry, SessionReport, SessionState, open,
};
