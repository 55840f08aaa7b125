//! Category domain module.
//!
//! - `model`: `CategoryDef`, `SettingDef`, `SettingKind`
//! - `capability`: caller-supplied `fetch`/`save`/reset traits
//! - `value`: derived display snapshots (`SettingValue`)

mod capability;
mod model;
mod value;

pub use capability::{CategoryReset, SettingAccessor};
pub use model::{CategoryDef, SettingDef, SettingKind};
pub use value::{DISPLAY_VALUE_LIMIT, SettingValue, truncate_chars};
