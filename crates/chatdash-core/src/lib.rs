//! Domain model and collaborator contracts for chatdash.
//!
//! # Module Structure
//!
//! - `category`: category/setting definitions and storage capabilities
//! - `config`: `DashboardConfig` with named defaults
//! - `validation`: `ConfigValidator` and the schema rules
//! - `render`: view payloads, `CategoryRenderer`, `FormBuilder`
//! - `event`: inbound interaction events and typed identifiers
//! - `transport`: outbound chat transport trait
//! - `error`: the shared `DashboardError`

pub mod category;
pub mod config;
pub mod error;
pub mod event;
pub mod render;
pub mod transport;
pub mod validation;

// Re-export common error type
pub use error::{DashboardError, Result};
