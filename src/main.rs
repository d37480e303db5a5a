//! PostWoman - tiny terminal API inspector
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous render loop, polls every frame
//! - App Layer - input buffers, editing and the cached formatted response
//! - Network Layer - single-flight fetch manager with a detached worker thread

use std::io;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};

use postwoman_tui::app::AppState;
use postwoman_tui::config::Config;
use postwoman_tui::constants::{APP_NAME, APP_VERSION};
use postwoman_tui::messages::ui_events::{key_to_ui_event, InputMode, Panel};
use postwoman_tui::messages::{RenderState, UiEvent};
use postwoman_tui::network::{FetchManager, HttpTransport};
use postwoman_tui::ui::{cursor_offset, method_color, status_color, visible_lines};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
    }
}

fn main() -> anyhow::Result<()> {
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Initialize logging to file
    let log_dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let log_name = config
        .log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "postwoman.log".into());
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_max_level(config.tracing_level())
        .init();

    tracing::info!(version = APP_VERSION, "{} starting", APP_NAME);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "ignoring unreadable config, using defaults");
    }

    let transport = HttpTransport::new(&config.fetch).context("setting up HTTP transport")?;
    let manager = FetchManager::new(transport);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = AppState::new(&config.default_url);
    let result = run_ui_loop(&mut terminal, &mut state, &manager);

    drop(guard);
    manager.shutdown();
    tracing::info!("{} exiting", APP_NAME);
    result
}

/// Run the synchronous UI rendering loop
fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    state: &mut AppState,
    manager: &FetchManager,
) -> anyhow::Result<()> {
    loop {
        state.sync_response(manager);
        let render = state.to_render_state(manager.is_loading());

        terminal.draw(|f| draw_ui(f, &render))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            let event = match event::read()? {
                Event::Key(key) => {
                    key_to_ui_event(key, render.active_panel, render.input_mode, render.show_help)
                }
                Event::Paste(text) if render.active_panel.is_editable() => {
                    Some(UiEvent::Paste(text))
                }
                _ => None,
            };

            if let Some(event) = event {
                if state.handle_event(event, manager) {
                    break;
                }
            }
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Method + URL
            Constraint::Length(8), // Body
            Constraint::Min(5),    // Response
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_url_bar(f, state, chunks[0]);
    draw_body_panel(f, state, chunks[1]);
    draw_response(f, state, chunks[2]);
    draw_status_bar(f, state, chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn border_style(state: &RenderState, panel: Panel) -> Style {
    let is_focused = state.active_panel == panel;
    if is_focused && state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_url_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let mcolor = method_color(state.method.as_str());
    let loading = if state.is_loading { " [...]" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Url))
        .title(format!(" {}{} ", state.method.as_str(), loading))
        .title_style(Style::default().fg(mcolor).bold());

    let (text, style) = if state.url.is_empty() {
        (
            "Enter URL (including http:// or https://)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (state.url.as_str(), Style::default())
    };
    f.render_widget(Paragraph::new(text).style(style).block(block), area);

    if state.active_panel == Panel::Url && state.input_mode == InputMode::Editing {
        let col = cursor_offset(state.url[..state.cursor_position].chars().count());
        let max_x = area.x.saturating_add(area.width.saturating_sub(2));
        let cursor_x = area.x.saturating_add(col).saturating_add(1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y.saturating_add(1)));
    }
}

fn draw_body_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Body))
        .title(" Body (optional, sends POST) ");

    let (text, style) = if state.body.is_empty() {
        (
            "Enter request body (optional)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (state.body.as_str(), Style::default())
    };
    let body = Paragraph::new(text)
        .style(style)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(body, area);

    if state.active_panel == Panel::Body && state.input_mode == InputMode::Editing {
        let before = &state.body[..state.cursor_position];
        let row = cursor_offset(before.matches('\n').count());
        let col = cursor_offset(before.rsplit('\n').next().unwrap_or("").chars().count());
        let max_x = area.x.saturating_add(area.width.saturating_sub(2));
        let max_y = area.y.saturating_add(area.height.saturating_sub(2));
        let cursor_x = area.x.saturating_add(col).saturating_add(1).min(max_x);
        let cursor_y = area.y.saturating_add(row).saturating_add(1).min(max_y);
        f.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_response(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut title = match state.status_code {
        Some(code) => vec![Span::styled(
            format!(" {} ", code),
            Style::default().fg(status_color(code)).bold(),
        )],
        None if state.is_loading => vec![Span::raw(" Loading... ")],
        None => vec![Span::raw(" Response ")],
    };
    if let Some(note) = &state.response_note {
        title.push(Span::styled(
            format!("({}) ", note),
            Style::default().fg(Color::Red),
        ));
    }

    let time_text = if state.time_ms > 0 {
        format!(" {}ms ", state.time_ms)
    } else {
        String::new()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Response))
        .title(Line::from(title))
        .title_bottom(Line::from(time_text).right_aligned());

    let lines = match state.response_placeholder {
        Some(text) => vec![Line::from(text)],
        None => visible_lines(&state.response_lines, state.response_scroll, area.height),
    };
    let response = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(response, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.is_loading {
        " Loading... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Enter:send (URL) / newline (body) "
    } else {
        " Tab:panel | e:edit | s:send | ↑/↓:scroll | ?:help | q:quit "
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = r#"
 POSTWOMAN - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   ↑ / ↓  (j / k)     Scroll response
   Home   (g)         Back to top

 REQUEST
   e / Enter          Edit URL or body
   s                  Send request
   Enter (URL)        Send while editing
   Paste              Replaces the focused field
   Empty body sends GET, otherwise POST

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
