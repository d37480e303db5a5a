//! Command handlers - business logic for processing UI events

use crate::app::state::ResponseView;
use crate::app::AppState;
use crate::format;
use crate::messages::ui_events::{InputMode, Panel};
use crate::network::{FetchManager, StartError};
use crate::ui;

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
        self.input_mode = InputMode::Normal;
        self.cursor_position = self.current_input().len();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
        self.input_mode = InputMode::Normal;
        self.cursor_position = self.current_input().len();
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.active_panel.is_editable() {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
    }

    /// Line break; only the body is multi-line
    pub fn enter_newline(&mut self) {
        if self.active_panel == Panel::Body {
            self.enter_char('\n');
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let cursor_pos = self.cursor_position;
            if let Some(input) = self.current_input_mut() {
                let prev_pos = input[..cursor_pos]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                input.remove(prev_pos);
                self.cursor_position = prev_pos;
            }
        }
    }

    /// Replace the focused field with pasted text
    pub fn paste(&mut self, text: &str) {
        let is_url = self.active_panel == Panel::Url;
        if let Some(input) = self.current_input_mut() {
            input.clear();
            if is_url {
                // A URL is one line; drop the breaks a copied URL often carries.
                input.extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
            } else {
                input.push_str(text);
            }
            self.cursor_position = input.len();
        }
    }

    // ========================
    // Response scrolling
    // ========================

    pub fn scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(1);
    }

    pub fn scroll_top(&mut self) {
        self.response_scroll = 0;
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Request sending
    // ========================

    /// Start a fetch for the current URL and body.
    ///
    /// Does nothing while a fetch is in flight. On success the formatted view
    /// is dropped; on rejection the previous response stays on screen.
    pub fn send_request(&mut self, manager: &FetchManager) -> Option<u64> {
        if manager.is_loading() {
            return None;
        }
        self.input_mode = InputMode::Normal;

        match manager.start_fetch(self.build_request()) {
            Ok(id) => {
                self.view = None;
                self.response_scroll = 0;
                Some(id)
            }
            Err(StartError::InFlight) => None,
            Err(e) => {
                tracing::warn!(error = %e, "could not start fetch");
                None
            }
        }
    }

    // ========================
    // Response handling
    // ========================

    /// Pick up a newly published response, then format and highlight it once.
    ///
    /// Frames reuse the result until another response is published.
    /// Returns true when the view changed.
    pub fn sync_response(&mut self, manager: &FetchManager) -> bool {
        let Some(response) = manager.response() else {
            return false;
        };
        if self.view.as_ref().is_some_and(|view| view.is_for(&response)) {
            return false;
        }

        let text = format::reformat_lossy(&response.body);
        let lines = ui::highlight_json(&text).into();
        self.reformat_count += 1;
        self.view = Some(ResponseView {
            source: response,
            text,
            lines,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FetchOutcome, FetchRequest};
    use crate::network::{FetchError, HttpReply, Transport};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Replies with a fixed body after an optional delay, recording requests
    #[derive(Clone, Default)]
    struct Canned {
        body: &'static str,
        delay_ms: u64,
        seen: Arc<Mutex<Vec<FetchRequest>>>,
    }

    impl Transport for Canned {
        fn execute(&self, request: &FetchRequest) -> Result<HttpReply, FetchError> {
            self.seen.lock().push(request.clone());
            thread::sleep(Duration::from_millis(self.delay_ms));
            Ok(HttpReply {
                status: 200,
                body: self.body.as_bytes().to_vec(),
                truncated: false,
            })
        }
    }

    fn wait_idle(manager: &FetchManager) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while manager.is_loading() {
            assert!(Instant::now() < deadline, "fetch never finished");
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn response_is_formatted_once_per_publish() {
        let manager = FetchManager::new(Canned {
            body: r#"{"a":1}"#,
            ..Default::default()
        });
        let mut state = AppState::new("http://api.test/a");

        assert!(!state.sync_response(&manager));
        assert!(state.send_request(&manager).is_some());
        wait_idle(&manager);

        assert!(state.sync_response(&manager));
        assert!(!state.sync_response(&manager));
        assert!(!state.sync_response(&manager));
        assert_eq!(state.reformat_count, 1);
        assert_eq!(state.view.as_ref().unwrap().text, "{\n\t\"a\": 1\n}");
    }

    #[test]
    fn frames_share_the_highlighted_lines() {
        let manager = FetchManager::new(Canned {
            body: r#"{"items":[1,2,3],"ok":true}"#,
            ..Default::default()
        });
        let mut state = AppState::new("http://api.test/big");
        state.send_request(&manager);
        wait_idle(&manager);
        state.sync_response(&manager);

        let first = state.to_render_state(false);
        state.scroll_down();
        state.sync_response(&manager);
        let second = state.to_render_state(false);

        let cached = &state.view.as_ref().unwrap().lines;
        assert_eq!(cached.len(), 8);
        assert!(Arc::ptr_eq(&first.response_lines, cached));
        assert!(Arc::ptr_eq(&second.response_lines, cached));
        assert_eq!(second.response_placeholder, None);
        assert_eq!(state.reformat_count, 1);
    }

    #[test]
    fn sending_drops_the_cached_view() {
        let manager = FetchManager::new(Canned {
            body: "[1]",
            delay_ms: 100,
            ..Default::default()
        });
        let mut state = AppState::new("http://api.test/");
        state.send_request(&manager);
        wait_idle(&manager);
        state.sync_response(&manager);
        assert!(state.view.is_some());

        state.response_scroll = 7;
        state.send_request(&manager);
        assert!(state.view.is_none());
        assert_eq!(state.response_scroll, 0);

        // The pending placeholder is a new response, but an empty one.
        state.sync_response(&manager);
        let render = state.to_render_state(manager.is_loading());
        assert!(render.is_loading);
        assert!(render.response_lines.is_empty());
        assert_eq!(render.response_placeholder, None);
        wait_idle(&manager);
    }

    #[test]
    fn rejected_send_leaves_state_alone() {
        let transport = Canned {
            body: "ok",
            delay_ms: 150,
            ..Default::default()
        };
        let manager = FetchManager::new(transport.clone());
        let mut state = AppState::new("http://api.test/");

        state.send_request(&manager);
        wait_idle(&manager);
        assert!(state.send_request(&manager).is_some());
        state.sync_response(&manager);
        let shown = Arc::clone(&state.view.as_ref().unwrap().source);

        state.url = String::from("http://other.test/");
        assert!(state.send_request(&manager).is_none());
        assert!(state.view.as_ref().unwrap().is_for(&shown));
        assert!(Arc::ptr_eq(&manager.response().unwrap(), &shown));

        wait_idle(&manager);
        assert_eq!(transport.seen.lock().len(), 2);
    }

    #[test]
    fn empty_body_sends_get_and_text_sends_post() {
        let transport = Canned {
            body: "",
            ..Default::default()
        };
        let manager = FetchManager::new(transport.clone());
        let mut state = AppState::new("  http://api.test/items  ");

        state.send_request(&manager);
        wait_idle(&manager);
        state.body = String::from("{\"name\":\"x\"}");
        state.send_request(&manager);
        wait_idle(&manager);

        let seen = transport.seen.lock();
        assert_eq!(seen[0], FetchRequest::get("http://api.test/items"));
        assert_eq!(seen[1], FetchRequest::post("http://api.test/items", "{\"name\":\"x\"}"));
    }

    #[test]
    fn empty_success_and_failure_render_differently() {
        struct Refused;
        impl Transport for Refused {
            fn execute(&self, _request: &FetchRequest) -> Result<HttpReply, FetchError> {
                Err(FetchError::Connect("refused".into()))
            }
        }

        let empty = FetchManager::new(Canned::default());
        let mut state = AppState::default();
        state.send_request(&empty);
        wait_idle(&empty);
        state.sync_response(&empty);
        let render = state.to_render_state(false);
        assert_eq!(render.status_code, Some(200));
        assert_eq!(render.response_note, None);
        assert!(render.response_lines.is_empty());
        assert_eq!(render.response_placeholder, Some("(empty response)"));

        let failing = FetchManager::new(Refused);
        let mut state = AppState::default();
        state.send_request(&failing);
        wait_idle(&failing);
        state.sync_response(&failing);
        let render = state.to_render_state(false);
        assert_eq!(render.status_code, None);
        assert!(render.response_note.unwrap().contains("refused"));
        assert!(matches!(
            state.view.unwrap().source.outcome,
            FetchOutcome::Failed { .. }
        ));
    }

    #[test]
    fn editing_respects_char_boundaries() {
        let mut state = AppState::new("");
        state.active_panel = Panel::Body;
        state.start_editing();
        for c in "aé✓".chars() {
            state.enter_char(c);
        }
        assert_eq!(state.cursor_position, state.body.len());

        state.move_cursor_left();
        state.delete_char();
        assert_eq!(state.body, "a✓");
        state.move_cursor_right();
        state.enter_newline();
        assert_eq!(state.body, "a✓\n");
    }

    #[test]
    fn paste_replaces_field_and_flattens_urls() {
        let mut state = AppState::new("http://old");
        state.paste("http://new/\r\npath");
        assert_eq!(state.url, "http://new/path");
        assert_eq!(state.cursor_position, state.url.len());

        state.next_panel();
        state.paste("{\n\"a\":1\n}");
        assert_eq!(state.body, "{\n\"a\":1\n}");

        state.next_panel();
        state.paste("ignored");
        assert_eq!(state.url, "http://new/path");
    }
}
