//! Registration page: three input fields, an inline API error and the
//! submit button.
//!
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, Focus};
use crate::form::Field;
use crate::ui::components::{centered_column, render_button};

const FORM_WIDTH: u16 = 60;
const MASK: char = '•';

pub fn render_register(f: &mut Frame, area: Rect, app: &mut AppState) {
    let column = centered_column(FORM_WIDTH, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2), // heading
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Length(2), // api error
                Constraint::Length(3), // submit
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(column);

    let heading = Paragraph::new(Line::from(Span::styled(
        "User Registration",
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    )));
    f.render_widget(heading, rows[0]);

    for (field, row) in Field::ALL.into_iter().zip(rows[1..4].iter()) {
        let input = render_field(f, *row, app, field);
        app.control_hitboxes.push((Focus::Field(field), input));
    }

    if let Some(err) = &app.form.api_error {
        let p = Paragraph::new(Span::styled(err.as_str(), Style::default().fg(app.theme.error)))
            .wrap(Wrap { trim: true });
        f.render_widget(p, rows[4]);
    }

    let label = if app.form.submitting {
        "Registering..."
    } else {
        "Register"
    };
    let button = render_button(f, rows[5], label, app.focus == Focus::Submit, &app.theme);
    app.control_hitboxes.push((Focus::Submit, button));
}

/// Label line, bordered input box and error line. Returns the input box.
fn render_field(f: &mut Frame, area: Rect, app: &AppState, field: Field) -> Rect {
    let theme = &app.theme;
    let focused = app.focus == Focus::Field(field);
    let error = app.form.error(field);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Length(1)].as_ref())
        .split(area);

    let mut label = vec![Span::styled(field.label(), Style::default().fg(theme.text))];
    if field.required() {
        label.push(Span::styled(" *", Style::default().fg(theme.error)));
    }
    f.render_widget(Paragraph::new(Line::from(label)), parts[0]);

    let border = match (error.is_some(), focused) {
        (true, _) => theme.error,
        (false, true) => theme.highlight_fg,
        (false, false) => theme.border,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(parts[1]);

    let value = app.form.value(field);
    let shown = if field.masked() {
        MASK.to_string().repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let text = if shown.is_empty() {
        Span::styled(field.placeholder(), Style::default().fg(theme.muted))
    } else {
        Span::styled(shown.clone(), Style::default().fg(theme.text))
    };
    f.render_widget(Paragraph::new(text).block(block), parts[1]);

    if focused {
        let offset = Span::raw(shown.as_str()).width() as u16;
        let x = inner.x + offset.min(inner.width.saturating_sub(1));
        f.set_cursor_position(Position::new(x, inner.y));
    }

    if let Some(err) = error {
        let p = Paragraph::new(Span::styled(err, Style::default().fg(theme.error)));
        f.render_widget(p, parts[2]);
    }
    parts[1]
}
