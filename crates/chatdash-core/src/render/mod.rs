//! Rendering collaborators.
//!
//! - `payload`: platform-neutral view, control and form descriptions
//! - `renderer`: `CategoryRenderer` and the stock `DefaultCategoryRenderer`
//! - `form`: `FormBuilder` and the stock `DefaultFormBuilder`

mod form;
mod payload;
mod renderer;

pub use form::{DefaultFormBuilder, FormBuilder, PLACEHOLDER_KEEP, PLACEHOLDER_LIMIT};
pub use payload::{
    Button, ButtonStyle, ComponentRow, ControlSet, DashboardView, Embed, EmbedField, FormField,
    FormPayload, SelectMenu, SelectOption, SettingFailure, TextStyle,
};
pub use renderer::{
    CategoryRenderer, DefaultCategoryRenderer, FAILURE_FIELD_TITLE, SELECTOR_PLACEHOLDER,
};
