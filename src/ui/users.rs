//! User listing page: one card per registered user.
//!
use chrono::{DateTime, Local, TimeZone};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::api::User;
use crate::app::{AppState, Focus, Listing, Theme};
use crate::ui::components::{card_block, centered_rect};

/// Format an RFC 3339 timestamp like "January 5, 2025, 03:04 PM" in local
/// time. Unparsable input is returned unchanged.
pub fn format_date(raw: &str) -> String {
    format_date_in(raw, &Local)
}

pub fn format_date_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt
            .with_timezone(tz)
            .format("%B %-d, %Y, %I:%M %p")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn render_users(f: &mut Frame, area: Rect, app: &mut AppState) {
    app.control_hitboxes.push((Focus::UserList, area));
    let theme = app.theme;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)].as_ref())
        .split(area);

    let mut header = vec![Span::styled(
        format!("Users ({})", app.users.len()),
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    )];
    if app.focus == Focus::UserList {
        header.push(Span::styled(
            "  ↑/↓ scroll  r refresh",
            Style::default().fg(theme.muted),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(header)), rows[0]);

    match &app.users.listing {
        Listing::NotLoaded => {
            let p = Paragraph::new(Span::styled("Loading…", Style::default().fg(theme.muted)));
            f.render_widget(p, rows[1]);
        }
        Listing::Failed(message) => {
            let lines = vec![
                Line::from(Span::styled(message.as_str(), Style::default().fg(theme.error))),
                Line::raw(""),
                Line::from(Span::styled(
                    "Make sure the backend is running and REGDESK_API_URL is correctly configured.",
                    Style::default().fg(theme.muted),
                )),
            ];
            render_message_card(f, rows[1], lines, &theme);
        }
        Listing::Loaded(users) if users.is_empty() => {
            let lines = vec![
                Line::from(Span::styled("No users found.", Style::default().fg(theme.text))),
                Line::raw(""),
                Line::from(Span::styled(
                    "Switch to the Register tab to add the first user.",
                    Style::default().fg(theme.muted),
                )),
            ];
            render_message_card(f, rows[1], lines, &theme);
        }
        Listing::Loaded(users) => render_cards(f, rows[1], users, app.users.scroll, &theme),
    }
}

fn render_message_card(f: &mut Frame, area: Rect, lines: Vec<Line<'_>>, theme: &Theme) {
    let rect = centered_rect(area.width.min(70), 7, area);
    let p = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(card_block(None, theme));
    f.render_widget(p, rect);
}

fn card_lines<'a>(user: &'a User, theme: &Theme) -> Vec<Line<'a>> {
    let label = Style::default().fg(theme.muted);
    let value = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(vec![
        Span::styled("Email       ", label),
        Span::styled(user.email.as_str(), value),
    ])];
    if let Some(name) = user.full_name.as_deref().filter(|n| !n.is_empty()) {
        lines.push(Line::from(vec![
            Span::styled("Full Name   ", label),
            Span::styled(name, value),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Registered  ", label),
        Span::styled(format_date(&user.created_at), Style::default().fg(theme.text)),
    ]));
    lines
}

/// Stack cards from `scroll` downwards until the area is full.
fn render_cards(f: &mut Frame, area: Rect, users: &[User], scroll: usize, theme: &Theme) {
    let mut y = area.y;
    let bottom = area.y + area.height;
    for user in users.iter().skip(scroll) {
        let lines = card_lines(user, theme);
        let height = lines.len() as u16 + 2;
        if y + height > bottom {
            break;
        }
        let rect = Rect::new(area.x, y, area.width, height);
        f.render_widget(Paragraph::new(lines).block(card_block(None, theme)), rect);
        y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn formats_like_a_long_us_date() {
        assert_eq!(
            format_date_in("2025-01-05T15:04:00Z", &Utc),
            "January 5, 2025, 03:04 PM"
        );
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_date_in("2025-12-31T23:30:00Z", &east),
            "January 1, 2026, 01:30 AM"
        );
    }

    #[test]
    fn unparsable_dates_pass_through() {
        assert_eq!(format_date("yesterday"), "yesterday");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn cards_skip_missing_full_name() {
        let user = User {
            id: "1".into(),
            email: "a@b.co".into(),
            full_name: None,
            created_at: "2025-01-05T15:04:00Z".into(),
        };
        assert_eq!(card_lines(&user, &Theme::mocha()).len(), 2);
        let named = User {
            full_name: Some("Ada".into()),
            ..user
        };
        assert_eq!(card_lines(&named, &Theme::mocha()).len(), 3);
    }
}
