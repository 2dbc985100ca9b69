pub mod aria;
pub mod components;
pub mod host;
pub mod modal;
pub mod register;
pub mod tabs;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders};

use crate::app::{AppState, Focus, Page, SUCCESS_TITLE};
use modal::ModalContent;

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let tab_focused = matches!(app.focus, Focus::Tab(_));
    app.tab_hitboxes = tabs::render_tab_bar(f, root[0], &app.tabs, tab_focused, &app.theme);

    app.control_hitboxes.clear();
    let panel = app
        .tabs
        .active_tab()
        .map(|t| (format!(" {} ", t.label), t.content));
    if let Some((title, page)) = panel {
        let block = Block::default()
            .title(Span::styled(title, Style::default().fg(app.theme.title)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border));
        let inner = block.inner(root[1]);
        f.render_widget(block, root[1]);
        match page {
            Page::Register => register::render_register(f, inner, app),
            Page::Users => users::render_users(f, inner, app),
        }
    }

    components::render_status_bar(f, root[2], app);

    let content = ModalContent {
        title: Some(SUCCESS_TITLE),
        body: Text::from(app.success.message.as_str()),
        actions: Some(Line::from(Span::styled(
            "[ View Users ]",
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ))),
    };
    modal::render_modal(f, f.area(), &app.modal, content, &app.theme);
}
