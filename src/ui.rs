use ratatui::{prelude::*, widgets::*};

use crate::app::state::{StatusLine, ViewState};
use crate::messages::ui_events::InputMode;
use crate::models::TransferOutcome;

/// Renders a single-line text input field
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool, is_editing: bool) -> Paragraph<'a> {
    let style = if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Format a SOL amount, trimming trailing zeros
pub fn format_sol(amount: f64) -> String {
    if !amount.is_finite() {
        return String::from("?");
    }
    let text = format!("{:.9}", amount);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" {
        String::from("0")
    } else {
        text.to_string()
    }
}

/// Shorten a base58 address to `head…tail`
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Terminal column of a byte cursor inside `text`
pub fn cursor_column(text: &str, byte_pos: usize) -> usize {
    match text.get(..byte_pos) {
        Some(prefix) => prefix.chars().count(),
        None => text.chars().count(),
    }
}

/// Key hints for the current view
pub fn key_hint(view: ViewState, input_mode: InputMode) -> &'static str {
    match view {
        ViewState::Disconnected => "c:connect | ?:help | q:quit",
        _ if input_mode == InputMode::Editing => "ESC:stop editing | arrows:move | Enter:done",
        _ => "Tab:panel | e:edit | a:add friend | s:send | r:refresh | d:disconnect | ?:help | q:quit",
    }
}

/// Status bar: latest status message, then the key hints
pub fn status_bar_line<'a>(status: Option<&'a StatusLine>, hint: &'a str) -> Line<'a> {
    let mut spans = Vec::with_capacity(3);
    if let Some(status) = status {
        let color = if status.is_error { Color::Red } else { Color::Gray };
        spans.push(Span::styled(format!(" {} ", status.text), Style::default().fg(color)));
        spans.push(Span::styled("|", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::styled(format!(" {} ", hint), Style::default().fg(Color::DarkGray)));
    Line::from(spans)
}

/// Activity outcome color
pub fn outcome_color(outcome: &TransferOutcome) -> Color {
    match outcome {
        TransferOutcome::Confirmed(_) => Color::Green,
        TransferOutcome::Failed(_) => Color::Red,
    }
}

/// Rectangle centered in `r`, sized by percentage
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sol() {
        assert_eq!(format_sol(2.0), "2");
        assert_eq!(format_sol(8.5), "8.5");
        assert_eq!(format_sol(0.000000001), "0.000000001");
        assert_eq!(format_sol(0.0), "0");
        assert_eq!(format_sol(f64::NAN), "?");
    }

    #[test]
    fn test_cursor_column_counts_chars() {
        assert_eq!(cursor_column("abc", 2), 2);
        assert_eq!(cursor_column("éé1", 4), 2);
        assert_eq!(cursor_column("日本", 6), 2);
        // Not on a char boundary
        assert_eq!(cursor_column("é", 1), 1);
    }

    #[test]
    fn test_status_bar_keeps_hints_with_status() {
        let hint = key_hint(ViewState::ConnectedIdle, InputMode::Normal);
        let status = StatusLine::error("Transfer failed: boom");
        let line = status_bar_line(Some(&status), hint);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("Transfer failed: boom"));
        assert!(text.contains("s:send"));

        let line = status_bar_line(None, key_hint(ViewState::Disconnected, InputMode::Normal));
        assert_eq!(line.spans.len(), 1);
        assert!(line.spans[0].content.contains("c:connect"));
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"),
            "Toke…Q5DA"
        );
        assert_eq!(shorten_address("short"), "short");
    }
}
