//! App state - pure data structure with no I/O logic

use std::sync::Arc;

use ratatui::text::Line;

use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::render::no_lines;
use crate::messages::RenderState;
use crate::models::{FetchOutcome, FetchRequest, FetchResponse};

/// Formatted and highlighted copy of one published response.
///
/// Keeps the `Arc` it was built from: a different `Arc` in the fetch
/// manager's cell means a new response and a stale view. The highlighted
/// lines are shared with every frame's [`RenderState`], never rebuilt.
#[derive(Clone, Debug)]
pub struct ResponseView {
    pub source: Arc<FetchResponse>,
    pub text: String,
    pub lines: Arc<[Line<'static>]>,
}

impl ResponseView {
    pub fn is_for(&self, response: &Arc<FetchResponse>) -> bool {
        Arc::ptr_eq(&self.source, response)
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Request data
    pub url: String,
    pub body: String,
    pub cursor_position: usize,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub response_scroll: u16,
    pub show_help: bool,

    // Response
    pub view: Option<ResponseView>,
    /// Reformat passes run so far; one per distinct response
    pub reformat_count: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_HTTP_URL)
    }
}

impl AppState {
    pub fn new(default_url: &str) -> Self {
        AppState {
            url: String::from(default_url),
            body: String::new(),
            cursor_position: default_url.len(),
            active_panel: Panel::Url,
            input_mode: InputMode::Normal,
            response_scroll: 0,
            show_help: false,
            view: None,
            reformat_count: 0,
        }
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match self.active_panel {
            Panel::Url => &self.url,
            Panel::Body => &self.body,
            Panel::Response => "",
        }
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.active_panel {
            Panel::Url => Some(&mut self.url),
            Panel::Body => Some(&mut self.body),
            Panel::Response => None,
        }
    }

    /// Request built from the input fields. An empty body means GET.
    pub fn build_request(&self) -> FetchRequest {
        let url = self.url.trim();
        if self.body.is_empty() {
            FetchRequest::get(url)
        } else {
            FetchRequest::post(url, self.body.as_bytes().to_vec())
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self, is_loading: bool) -> RenderState {
        let (status_code, response_note, time_ms) = match &self.view {
            Some(view) => {
                let note = match &view.source.outcome {
                    FetchOutcome::Failed { message } => Some(message.clone()),
                    FetchOutcome::Completed { truncated: true, .. } => {
                        Some(String::from("body truncated"))
                    }
                    _ => None,
                };
                (view.source.status_code(), note, view.source.time_ms)
            }
            None => (None, None, 0),
        };

        let (response_lines, response_placeholder) = match &self.view {
            Some(view) if !view.text.is_empty() => (Arc::clone(&view.lines), None),
            Some(view) if view.source.is_pending() => (no_lines(), None),
            Some(_) => (no_lines(), Some("(empty response)")),
            None => (no_lines(), Some("(no response yet)")),
        };

        RenderState {
            method: self.build_request().method(),
            url: self.url.clone(),
            body: self.body.clone(),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            status_code,
            response_note,
            response_lines,
            response_placeholder,
            response_scroll: self.response_scroll,
            time_ms,
            is_loading,
            show_help: self.show_help,
        }
    }
}
