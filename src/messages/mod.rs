//! Message types between the terminal shell and the app layer.
//!
//! Key presses become [`UiEvent`]s for the app; the app hands back a
//! [`RenderState`] snapshot for drawing.

pub mod ui_events;
pub mod render;

pub use ui_events::UiEvent;
pub use render::RenderState;
