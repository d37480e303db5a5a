//! Event dispatch - routes UI events to the command handlers

use crate::app::AppState;
use crate::messages::UiEvent;
use crate::network::FetchManager;

impl AppState {
    /// Handle a UI event, returns true if quit was requested
    pub fn handle_event(&mut self, event: UiEvent, manager: &FetchManager) -> bool {
        match event {
            // Panel navigation
            UiEvent::NextPanel => self.next_panel(),
            UiEvent::PrevPanel => self.prev_panel(),
            UiEvent::ScrollUp => self.scroll_up(),
            UiEvent::ScrollDown => self.scroll_down(),
            UiEvent::ScrollTop => self.scroll_top(),

            // Input editing
            UiEvent::StartEditing => self.start_editing(),
            UiEvent::StopEditing => self.stop_editing(),
            UiEvent::CharInput(c) => self.enter_char(c),
            UiEvent::Newline => self.enter_newline(),
            UiEvent::Backspace => self.delete_char(),
            UiEvent::CursorLeft => self.move_cursor_left(),
            UiEvent::CursorRight => self.move_cursor_right(),
            UiEvent::Paste(text) => self.paste(&text),

            // Request
            UiEvent::SendRequest => {
                if let Some(id) = self.send_request(manager) {
                    tracing::debug!(id, "fetch started from UI");
                }
            }

            // Popups
            UiEvent::ToggleHelp => self.toggle_help(),
            UiEvent::CloseHelp => self.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
