//! Application state types and entry glue.
//!
//! Defines the pages, focus ring and modal wiring that tie the registration
//! form and user listing to the tab and modal widgets, plus the theme loader.
//! The event loop lives in `update` (re-exported as `run`).
//!
pub mod keymap;
pub mod update;

use ratatui::layout::Rect;
use ratatui::style::Color;
use std::cell::Cell;
use std::rc::Rc;

use crate::api::{User, UserDirectory};
use crate::form::{Field, RegisterForm, SubmitOutcome};
use crate::ui::host::Document;
use crate::ui::modal::ModalController;
use crate::ui::tabs::{Tab, TabsController};

pub const REGISTER_TAB: &str = "register";
pub const USERS_TAB: &str = "users";
pub const SUCCESS_TITLE: &str = "Registration Successful";
pub const LISTING_FAILURE_MESSAGE: &str = "Failed to fetch users. Please check your API connection.";

/// Content of a top-level tab.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Register,
    Users,
}

/// Element holding keyboard focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    /// The tab control at this index.
    Tab(usize),
    Field(Field),
    Submit,
    UserList,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub error: Color,
}

const THEME_KEYS: [&str; 8] = [
    "text",
    "muted",
    "title",
    "border",
    "status_bg",
    "status_fg",
    "highlight_fg",
    "error",
];

impl Theme {
    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    /// Parse `key = color` lines. Unknown keys and bad colors are skipped;
    /// missing keys keep the `mocha` value.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let (Some(slot), Some(color)) = (theme.slot(key.trim()), parse_color(val)) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        let mut copy = *self;
        let mut buf = String::from(
            "# regdesk theme configuration\n# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n",
        );
        for key in THEME_KEYS {
            if let Some(c) = copy.slot(key) {
                buf.push_str(&format!("{key} = {}\n", format_color(*c)));
            }
        }
        std::fs::write(path, buf)
    }

    /// Load `path`, or write the default theme there when it does not exist.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        if let Err(e) = theme.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default theme");
        }
        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Parse "#RRGGBB", "RRGGBB" or "reset".
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn format_color(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
        Color::White => "#FFFFFF".to_string(),
        Color::Black => "#000000".to_string(),
        _ => "reset".to_string(),
    }
}

/// Load state of the user listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Listing {
    NotLoaded,
    Loaded(Vec<User>),
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct UsersView {
    pub listing: Listing,
    pub scroll: usize,
}

impl Default for UsersView {
    fn default() -> Self {
        Self {
            listing: Listing::NotLoaded,
            scroll: 0,
        }
    }
}

impl UsersView {
    pub fn len(&self) -> usize {
        match &self.listing {
            Listing::Loaded(users) => users.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Host-owned state of the registration success dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuccessDialog {
    pub is_open: bool,
    pub message: String,
}

/// Startup settings for [`AppState`].
#[derive(Clone, Debug)]
pub struct AppOptions {
    pub default_tab: Option<String>,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            default_tab: Some(REGISTER_TAB.to_string()),
            theme: Theme::mocha(),
            keymap: keymap::Keymap::default(),
        }
    }
}

pub struct AppState {
    pub document: Document,
    pub tabs: TabsController<Page>,
    pub focus: Focus,
    pub form: RegisterForm,
    pub users: UsersView,
    pub success: SuccessDialog,
    pub modal: ModalController,
    close_requested: Rc<Cell<bool>>,
    pub pending_submit: bool,
    pub directory: Box<dyn UserDirectory>,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    /// Label cells of the tab bar from the last frame.
    pub tab_hitboxes: Vec<Rect>,
    /// Clickable controls of the active page from the last frame.
    pub control_hitboxes: Vec<(Focus, Rect)>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(directory: Box<dyn UserDirectory>, options: AppOptions) -> Self {
        let document = Document::new();
        let close_requested = Rc::new(Cell::new(false));
        let modal = {
            let flag = close_requested.clone();
            ModalController::new(&document, move || flag.set(true))
        };
        let tabs = TabsController::new(
            vec![
                Tab::new(REGISTER_TAB, "Register", Page::Register),
                Tab::new(USERS_TAB, "View Users", Page::Users),
            ],
            options.default_tab.as_deref(),
        );
        let focus = Focus::Tab(tabs.active_index().unwrap_or(0));
        let mut app = Self {
            document,
            tabs,
            focus,
            form: RegisterForm::default(),
            users: UsersView::default(),
            success: SuccessDialog::default(),
            modal,
            close_requested,
            pending_submit: false,
            directory,
            theme: options.theme,
            keymap: options.keymap,
            tab_hitboxes: Vec::new(),
            control_hitboxes: Vec::new(),
            should_quit: false,
        };
        if app.active_page() == Some(Page::Users) {
            app.refresh_users();
        }
        app
    }

    pub fn active_page(&self) -> Option<Page> {
        self.tabs.active_tab().map(|t| t.content)
    }

    /// Focusable elements in `Tab` order. Only the active tab control is part
    /// of the ring.
    pub fn focus_ring(&self) -> Vec<Focus> {
        let mut ring = Vec::new();
        if let Some(i) = self.tabs.active_index() {
            ring.push(Focus::Tab(i));
        }
        match self.active_page() {
            Some(Page::Register) => {
                ring.extend(Field::ALL.into_iter().map(Focus::Field));
                ring.push(Focus::Submit);
            }
            Some(Page::Users) => ring.push(Focus::UserList),
            None => {}
        }
        ring
    }

    fn cycle_focus(&mut self, forward: bool) {
        let ring = self.focus_ring();
        if ring.is_empty() {
            return;
        }
        let here = match self.focus {
            // any tab control counts as the tab list's slot
            Focus::Tab(_) => ring.iter().position(|f| matches!(f, Focus::Tab(_))),
            other => ring.iter().position(|f| *f == other),
        };
        let next = match (here, forward) {
            (Some(i), true) => (i + 1) % ring.len(),
            (Some(i), false) => (i + ring.len() - 1) % ring.len(),
            (None, _) => 0,
        };
        self.focus = ring[next];
    }

    pub fn focus_next(&mut self) {
        self.cycle_focus(true);
    }

    pub fn focus_prev(&mut self) {
        self.cycle_focus(false);
    }

    /// Activate a tab by id and follow it with focus, loading the listing
    /// when the users tab comes up.
    pub fn select_tab(&mut self, id: &str) {
        if self.tabs.select(id) {
            if let Some(i) = self.tabs.active_index() {
                self.focus = Focus::Tab(i);
            }
            self.on_tab_changed();
        }
    }

    pub fn on_tab_changed(&mut self) {
        if self.active_page() == Some(Page::Users) && self.users.listing == Listing::NotLoaded {
            self.refresh_users();
        }
    }

    pub fn refresh_users(&mut self) {
        self.users.scroll = 0;
        self.users.listing = match self.directory.list_users() {
            Ok(users) => {
                tracing::info!(count = users.len(), "user listing loaded");
                Listing::Loaded(users)
            }
            Err(err) => {
                tracing::warn!(status = ?err.status(), error = %err, "user listing failed");
                Listing::Failed(err.listing_message(LISTING_FAILURE_MESSAGE))
            }
        };
    }

    /// Background scrolling of the listing; ignored while the document is
    /// scroll-locked.
    pub fn scroll_users(&mut self, delta: isize) {
        if self.document.is_scroll_locked() {
            return;
        }
        let max = self.users.len().saturating_sub(1);
        self.users.scroll = self.users.scroll.saturating_add_signed(delta).min(max);
    }

    /// Mark the form as submitting; the request runs after the next frame.
    pub fn begin_submit(&mut self) {
        self.form.submitting = true;
        self.pending_submit = true;
    }

    pub fn perform_submit(&mut self) {
        self.pending_submit = false;
        match self.form.submit(self.directory.as_ref()) {
            SubmitOutcome::Registered { message } => {
                self.success = SuccessDialog {
                    is_open: true,
                    message,
                };
                self.users.listing = Listing::NotLoaded;
                self.focus = Focus::Field(Field::Email);
            }
            SubmitOutcome::Invalid => {
                if let Some(field) = Field::ALL.into_iter().find(|f| self.form.error(*f).is_some()) {
                    self.focus = Focus::Field(field);
                }
            }
            SubmitOutcome::Failed => {}
        }
        self.sync_modal();
    }

    /// Ask the host to close the success dialog, as the dialog's own action does.
    pub fn request_close(&self) {
        self.close_requested.set(true);
    }

    /// Honor a close requested by the dialog since the last event.
    pub fn apply_close_request(&mut self) {
        if !self.close_requested.replace(false) {
            return;
        }
        if self.success.is_open {
            self.success.is_open = false;
            self.users.listing = Listing::NotLoaded;
            self.select_tab(USERS_TAB);
            self.on_tab_changed();
        }
        self.sync_modal();
    }

    /// Reconcile the modal controller with the host-owned open flag.
    pub fn sync_modal(&mut self) {
        self.modal.reconcile(self.success.is_open);
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
