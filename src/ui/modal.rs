//! Modal dialog: open/close lifecycle driven by a host-owned flag.
//!
//! While open, the controller holds exactly one Escape key listener, one
//! outside-press listener and the scroll lock on the host [`Document`]. All
//! three live in a single [`Subscription`], so closing, tearing down or
//! dropping the controller gives them back exactly once.
//!
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::app::Theme;
use crate::ui::aria::{DialogAttrs, Role};
use crate::ui::components::centered_rect;
use crate::ui::host::{Document, Subscription};

/// Identifier of the title node referenced by `aria-labelledby`.
pub const MODAL_TITLE_ID: &str = "modal-title";

type CloseCallback = Rc<dyn Fn()>;

/// Where a pointer press landed relative to the dialog content.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PressTarget {
    /// On the content panel or one of its descendants.
    Inside,
    /// On the backdrop or anywhere else on screen.
    Outside,
    /// The content has not been laid out yet.
    Unknown,
}

pub fn classify_press(content: Option<Rect>, at: Position) -> PressTarget {
    match content {
        Some(area) if area.contains(at) => PressTarget::Inside,
        Some(_) => PressTarget::Outside,
        None => PressTarget::Unknown,
    }
}

pub struct ModalController {
    document: Document,
    on_close: Rc<RefCell<CloseCallback>>,
    content_area: Rc<Cell<Option<Rect>>>,
    session: Option<Subscription>,
}

impl std::fmt::Debug for ModalController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalController")
            .field("open", &self.is_open())
            .field("content_area", &self.content_area.get())
            .field("session", &self.session)
            .finish()
    }
}

impl ModalController {
    /// Create a closed controller bound to `document`.
    pub fn new(document: &Document, on_close: impl Fn() + 'static) -> Self {
        Self {
            document: document.clone(),
            on_close: Rc::new(RefCell::new(Rc::new(on_close))),
            content_area: Rc::new(Cell::new(None)),
            session: None,
        }
    }

    /// Replace the dismissal callback. Registered listeners pick it up
    /// without being re-registered.
    pub fn set_on_close(&mut self, on_close: impl Fn() + 'static) {
        *self.on_close.borrow_mut() = Rc::new(on_close);
    }

    /// Bring the controller in line with the host's `is_open`.
    ///
    /// Returns `true` when a transition happened.
    pub fn reconcile(&mut self, is_open: bool) -> bool {
        match (is_open, self.session.is_some()) {
            (true, false) => {
                self.session = Some(self.open_session());
                tracing::debug!("modal opened; listeners registered, scroll locked");
                true
            }
            (false, true) => {
                self.teardown();
                true
            }
            _ => false,
        }
    }

    fn open_session(&self) -> Subscription {
        let on_escape = {
            let on_close = Rc::clone(&self.on_close);
            move |key: &KeyEvent| {
                if key.code == KeyCode::Esc {
                    invoke(&on_close);
                }
            }
        };
        let on_press = {
            let on_close = Rc::clone(&self.on_close);
            let content = Rc::clone(&self.content_area);
            move |at: Position| {
                if classify_press(content.get(), at) == PressTarget::Outside {
                    invoke(&on_close);
                }
            }
        };
        Subscription::new(&self.document)
            .on_key(on_escape)
            .on_pointer(on_press)
            .lock_scroll()
    }

    /// Leave the open state unconditionally, e.g. when the host unmounts.
    pub fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            session.release();
            tracing::debug!("modal closed; listeners removed, scroll restored");
        }
        self.content_area.set(None);
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn listeners_active(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.listener_count() == 2 && s.holds_scroll_lock())
    }

    /// Record the laid-out content panel; presses outside it dismiss.
    pub fn set_content_area(&self, area: Rect) {
        self.content_area.set(Some(area));
    }

    pub fn content_area(&self) -> Option<Rect> {
        self.content_area.get()
    }

    pub fn attrs(&self, has_title: bool) -> Option<DialogAttrs> {
        self.is_open().then(|| DialogAttrs {
            role: Role::Dialog,
            aria_modal: true,
            labelled_by: has_title.then_some(MODAL_TITLE_ID),
        })
    }
}

fn invoke(on_close: &RefCell<CloseCallback>) {
    let callback = Rc::clone(&on_close.borrow());
    callback();
}

/// Opaque blocks rendered inside the dialog.
#[derive(Clone, Debug, Default)]
pub struct ModalContent<'a> {
    pub title: Option<&'a str>,
    pub body: Text<'a>,
    pub actions: Option<Line<'a>>,
}

/// Panel height for a body of `body_lines` lines: borders, padding and the
/// action row, kept between 5 rows and the screen height minus a margin.
fn dialog_height(body_lines: usize, actions_h: u16, screen_h: u16) -> u16 {
    u16::try_from(body_lines)
        .unwrap_or(u16::MAX)
        .saturating_add(actions_h)
        .saturating_add(4)
        .min(screen_h.saturating_sub(4).max(5))
        .max(5)
}

/// Draw the dialog over `area` if the controller is open, and record the
/// content panel so outside presses can be recognized.
pub fn render_modal(
    f: &mut Frame,
    area: Rect,
    controller: &ModalController,
    content: ModalContent<'_>,
    theme: &Theme,
) {
    if !controller.is_open() {
        return;
    }
    f.buffer_mut()
        .set_style(area, Style::default().add_modifier(Modifier::DIM));

    let max_w = area.width.saturating_sub(6).max(30);
    let width = 50u16.min(max_w);
    let actions_h = if content.actions.is_some() { 2 } else { 0 };
    let height = dialog_height(content.body.height(), actions_h, area.height);
    let rect = centered_rect(width, height, area);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    if let Some(title) = content.title {
        block = block.title(Line::styled(
            format!(" {title} "),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ));
    }
    let inner = block.inner(rect);
    f.render_widget(Clear, rect);
    f.render_widget(block, rect);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(actions_h)])
        .split(inner);
    let body = Paragraph::new(content.body)
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: false });
    f.render_widget(body, parts[0]);
    if let Some(actions) = content.actions {
        let p = Paragraph::new(actions)
            .alignment(Alignment::Right)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(theme.border)),
            );
        f.render_widget(p, parts[1]);
    }

    controller.set_content_area(rect);
}
