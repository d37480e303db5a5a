use ratatui::prelude::*;

/// Columns a tab from the reformatter is drawn as
const TAB_WIDTH: usize = 2;

/// Syntax colouring for reformatted response text.
///
/// Works line by line on the reformatter's output, so it only has to know
/// about strings, keys (a string followed by `:`), brackets, numbers and the
/// `true`/`false`/`null` literals. Anything else is drawn plain.
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    let indent = " ".repeat(TAB_WIDTH);
    text.lines()
        .map(|line| highlight_line(&line.replace('\t', &indent)))
        .collect()
}

fn highlight_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                flush(&mut spans, &mut current);
                let mut string = String::from('"');
                let mut escape = false;
                for (_, s) in chars.by_ref() {
                    string.push(s);
                    if escape {
                        escape = false;
                    } else if s == '\\' {
                        escape = true;
                    } else if s == '"' {
                        break;
                    }
                }
                let rest = &line[(i + string.len()).min(line.len())..];
                let color = if rest.starts_with(':') { Color::Cyan } else { Color::Green };
                spans.push(Span::styled(string, Style::default().fg(color)));
            }
            '{' | '}' | '[' | ']' => {
                flush(&mut spans, &mut current);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
            }
            ':' | ',' => {
                flush(&mut spans, &mut current);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::White)));
            }
            _ => current.push(c),
        }
    }
    flush(&mut spans, &mut current);

    Line::from(spans)
}

/// Emit a pending bare token, coloured if it is a number or literal
fn flush(spans: &mut Vec<Span<'static>>, current: &mut String) {
    if current.is_empty() {
        return;
    }
    let token = std::mem::take(current);
    let trimmed = token.trim();
    let style = if matches!(trimmed, "true" | "false" | "null") {
        Style::default().fg(Color::Magenta)
    } else if !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
    {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    spans.push(Span::styled(token, style));
}

/// Lines of the response panel for the given scroll offset.
///
/// Only the rows that fit are cloned, so a frame costs the same whatever the
/// size of the response.
pub fn visible_lines(lines: &[Line<'static>], scroll: u16, height: u16) -> Vec<Line<'static>> {
    let start = usize::from(scroll).min(lines.len());
    lines[start..]
        .iter()
        .take(usize::from(height))
        .cloned()
        .collect()
}

/// Terminal cell offset for a character count, clamped to the screen range
pub fn cursor_offset(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: &str) -> Color {
    match method {
        "GET" => Color::Green,
        "POST" => Color::Yellow,
        _ => Color::White,
    }
}
