//! Shared UI components (status bar, cards, input fields, layout helpers).
//!
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, Focus, SUCCESS_TITLE, Theme};

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Horizontally center a column of at most `max_width` inside `area`.
pub fn centered_column(max_width: u16, area: Rect) -> Rect {
    let width = max_width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Bordered block used for cards and boxed messages.
pub fn card_block<'a>(title: Option<&'a str>, theme: &Theme) -> Block<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    match title {
        Some(t) => block.title(Span::styled(t, Style::default().fg(theme.title))),
        None => block,
    }
}

/// Spoken-style description of the focused element, derived from the
/// widgets' accessibility attributes.
pub fn announce(app: &AppState) -> String {
    if let Some(attrs) = app.modal.attrs(true) {
        return format!("{}: {}", attrs.role, SUCCESS_TITLE);
    }
    match app.focus {
        Focus::Tab(i) => {
            let attrs = app.tabs.tab_attrs();
            match (app.tabs.tabs().get(i), attrs.get(i)) {
                (Some(tab), Some(a)) => format!(
                    "{}: {}{}, {} of {}",
                    a.role,
                    tab.label,
                    if a.selected { ", selected" } else { "" },
                    i + 1,
                    app.tabs.len()
                ),
                _ => String::new(),
            }
        }
        Focus::Field(field) => {
            let mut s = format!("edit: {}", field.label());
            if field.required() {
                s.push_str(", required");
            }
            if let Some(err) = app.form.error(field) {
                s.push_str(&format!(", invalid: {err}"));
            }
            s
        }
        Focus::Submit => "button: Register".to_string(),
        Focus::UserList => format!("list: {} users", app.users.len()),
    }
}

/// Render the bottom status bar: focus announcement and key hints.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let quit = app.keymap.keys_for(KeyAction::Quit).join("/");
    let hints = if app.modal.is_open() {
        "Enter: view users  Esc: close".to_string()
    } else {
        format!("Tab: next  ←/→ Home End: tabs  Enter: submit  {quit}: quit")
    };
    let line = Line::from(vec![
        Span::styled(announce(app), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  │  "),
        Span::raw(hints),
    ]);
    let p = Paragraph::new(line).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render a full-width button; returns its area.
pub fn render_button(f: &mut Frame, area: Rect, label: &str, focused: bool, theme: &Theme) -> Rect {
    let mut style = Style::default().fg(theme.highlight_fg).add_modifier(Modifier::BOLD);
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    let p = Paragraph::new(Span::styled(format!(" {label} "), style))
        .alignment(Alignment::Center)
        .block(card_block(None, theme));
    f.render_widget(p, area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(40, 40, area), Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn centered_column_keeps_height() {
        let area = Rect::new(2, 3, 100, 7);
        assert_eq!(centered_column(60, area), Rect::new(22, 3, 60, 7));
        assert_eq!(centered_column(60, Rect::new(0, 0, 30, 5)).width, 30);
    }
}
