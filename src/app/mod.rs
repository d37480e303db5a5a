//! App layer - consumer-side state and command processing
//!
//! The render loop feeds [`UiEvent`](crate::messages::UiEvent)s in, polls the
//! fetch manager once per frame through [`AppState::sync_response`], and draws
//! from the [`RenderState`](crate::messages::RenderState) it hands back.

pub mod state;
pub mod commands;
pub mod events;

pub use state::{AppState, ResponseView};
