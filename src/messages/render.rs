//! Render state - snapshot the UI layer draws from each frame

use std::sync::Arc;

use ratatui::text::Line;

use crate::messages::ui_events::{InputMode, Panel};
use crate::models::HttpMethod;

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Request data
    pub method: HttpMethod,
    pub url: String,
    pub body: String,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Response
    pub status_code: Option<u16>,
    /// Failure message or truncation note shown in the response title
    pub response_note: Option<String>,
    /// Highlighted response, shared with the app's cached view
    pub response_lines: Arc<[Line<'static>]>,
    /// Shown instead of the response when there is nothing to draw
    pub response_placeholder: Option<&'static str>,
    pub response_scroll: u16,
    pub time_ms: u64,
    pub is_loading: bool,

    // Popups
    pub show_help: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        use crate::constants::DEFAULT_HTTP_URL;
        RenderState {
            method: HttpMethod::GET,
            url: String::from(DEFAULT_HTTP_URL),
            body: String::new(),
            active_panel: Panel::Url,
            input_mode: InputMode::Normal,
            cursor_position: DEFAULT_HTTP_URL.len(),
            status_code: None,
            response_note: None,
            response_lines: no_lines(),
            response_placeholder: None,
            response_scroll: 0,
            time_ms: 0,
            is_loading: false,
            show_help: false,
        }
    }
}

/// Shared empty response, for frames with nothing to draw
pub fn no_lines() -> Arc<[Line<'static>]> {
    Arc::new([])
}
