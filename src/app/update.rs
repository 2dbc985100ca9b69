use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Position;
use std::time::Duration;

use crate::app::keymap::KeyAction;
use crate::app::{AppState, Focus, Page};
use crate::ui;
use crate::ui::tabs::hit_test;

const PAGE_STEP: isize = 5;

/// Draw, then wait for input, until the user quits.
///
/// A pending submit runs right after the frame that shows "Registering...".
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if app.should_quit {
            break;
        }
        if app.pending_submit {
            app.perform_submit();
            continue;
        }
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            handle_event(app, &ev);
        }
    }
    app.modal.teardown();
    Ok(())
}

/// Route one terminal event.
///
/// Key presses and mouse presses of any button go to the document listeners
/// first. While a dialog is open it swallows the event; otherwise the page
/// gets it.
pub fn handle_event(app: &mut AppState, ev: &Event) {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        _ => {}
    }
}

fn handle_key(app: &mut AppState, key: &KeyEvent) {
    let was_open = app.modal.is_open();
    app.document.dispatch_key(key);
    app.apply_close_request();

    if was_open {
        match app.keymap.resolve(key) {
            Some(KeyAction::Activate) if app.modal.is_open() => {
                app.request_close();
                app.apply_close_request();
            }
            Some(KeyAction::Quit) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true;
            }
            _ => {}
        }
        return;
    }

    match app.focus {
        Focus::Tab(index) => {
            if let Some(request) = app.tabs.handle_key(key.code, index) {
                app.focus = Focus::Tab(request.index);
                app.on_tab_changed();
                return;
            }
        }
        Focus::Field(field) => {
            let typing = !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
            match key.code {
                KeyCode::Char(c) if typing => {
                    app.form.push_char(field, c);
                    return;
                }
                KeyCode::Backspace => {
                    app.form.pop_char(field);
                    return;
                }
                _ => {}
            }
        }
        Focus::Submit | Focus::UserList => {}
    }

    let Some(action) = app.keymap.resolve(key) else {
        return;
    };
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::FocusNext => app.focus_next(),
        KeyAction::FocusPrev => app.focus_prev(),
        KeyAction::Activate => {
            if matches!(app.focus, Focus::Field(_) | Focus::Submit) && !app.form.submitting {
                app.begin_submit();
            }
        }
        KeyAction::Refresh => {
            if app.active_page() == Some(Page::Users) {
                app.refresh_users();
            }
        }
        KeyAction::ScrollUp => app.scroll_users(-1),
        KeyAction::ScrollDown => app.scroll_users(1),
        KeyAction::PageUp => app.scroll_users(-PAGE_STEP),
        KeyAction::PageDown => app.scroll_users(PAGE_STEP),
    }
}

fn handle_mouse(app: &mut AppState, mouse: &MouseEvent) {
    let at = Position::new(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(button) => {
            let was_open = app.modal.is_open();
            app.document.dispatch_pointer(at);
            app.apply_close_request();
            // controls only answer the primary button
            if was_open || button != MouseButton::Left {
                return;
            }
            if let Some(index) = hit_test(&app.tab_hitboxes, at) {
                if let Some(id) = app.tabs.tabs().get(index).map(|t| t.id.clone()) {
                    app.select_tab(&id);
                }
                return;
            }
            let hit = app
                .control_hitboxes
                .iter()
                .find(|(_, r)| r.contains(at))
                .map(|(focus, _)| *focus);
            if let Some(focus) = hit {
                app.focus = focus;
                if focus == Focus::Submit && !app.form.submitting {
                    app.begin_submit();
                }
            }
        }
        // wheel input reaches the background list unless the document is scroll-locked
        MouseEventKind::ScrollDown => app.scroll_users(1),
        MouseEventKind::ScrollUp => app.scroll_users(-1),
        _ => {}
    }
}
