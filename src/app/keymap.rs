//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Tab-list navigation (arrows, `Home`, `End`) and `Esc` for dialogs are fixed
//! by the widgets and are not part of the keymap. Plain characters typed into a
//! form field are text, so only bindings with a modifier or a non-character key
//! apply while a field has focus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Move focus to the next element of the focus ring.
    FocusNext,
    /// Move focus to the previous element of the focus ring.
    FocusPrev,
    /// Press the focused control (submit, dialog action).
    Activate,
    /// Reload the user listing.
    Refresh,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
}

const ACTIONS: [(&str, KeyAction); 9] = [
    ("Quit", KeyAction::Quit),
    ("FocusNext", KeyAction::FocusNext),
    ("FocusPrev", KeyAction::FocusPrev),
    ("Activate", KeyAction::Activate),
    ("Refresh", KeyAction::Refresh),
    ("ScrollUp", KeyAction::ScrollUp),
    ("ScrollDown", KeyAction::ScrollDown),
    ("PageUp", KeyAction::PageUp),
    ("PageDown", KeyAction::PageDown),
];

/// Mapping from `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Tab), KeyAction::FocusNext);
        // Shift+Tab is BackTab in crossterm; some terminals add SHIFT
        bindings.insert((M::NONE, BackTab), KeyAction::FocusPrev);
        bindings.insert((M::SHIFT, BackTab), KeyAction::FocusPrev);
        bindings.insert((M::NONE, Enter), KeyAction::Activate);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        bindings.insert((M::CONTROL, Char('r')), KeyAction::Refresh);
        bindings.insert((M::NONE, Up), KeyAction::ScrollUp);
        bindings.insert((M::NONE, Down), KeyAction::ScrollDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::ScrollUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::ScrollDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        Self { bindings }
    }

    /// Load `path` on top of the defaults, or write the defaults there when it
    /// does not exist.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default keybindings");
        }
        km
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Parse `Action = KeySpec` lines over the defaults. Bad lines are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::debug!(line, "ignoring keybinding line"),
            }
        }
        map
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# regdesk keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Tab, BackTab, Up, Down, PageUp, PageDown, F5\n");
        buf.push_str("# Actions: Quit, FocusNext, FocusPrev, Activate, Refresh, ScrollUp, ScrollDown, PageUp, PageDown\n\n");

        let mut entries: Vec<(String, &'static str)> = self
            .bindings
            .iter()
            .map(|((m, c), a)| (Self::format_key(*m, *c), format_action(*a)))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)));
        for (key, action) in entries {
            let _ = writeln!(&mut buf, "{action} = {key}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Human-readable key spec like "Ctrl+q" or "BackTab".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Char(c) => c.to_string(),
            F(n) => format!("F{n}"),
            Enter => "Enter".into(),
            Tab => "Tab".into(),
            BackTab => "BackTab".into(),
            Up => "Up".into(),
            Down => "Down".into(),
            PageUp => "PageUp".into(),
            PageDown => "PageDown".into(),
            other => format!("{other:?}"),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{base}")
        } else {
            base
        }
    }

    /// Keys bound to `action`, formatted, for the help line.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            if let Some(n) = rest.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                F(n)
            } else {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Char(c),
                    _ => return None,
                }
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTIONS.iter().find(|(name, _)| *name == s).map(|(_, a)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTIONS
        .iter()
        .find(|(_, action)| *action == a)
        .map(|(name, _)| *name)
        .unwrap_or("Unknown")
}
