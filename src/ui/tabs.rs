//! Tabs: one active tab among an ordered, uniquely keyed set.
//!
//! Keyboard navigation follows the roving-tabindex pattern: only the active
//! tab control is reachable with `Tab`/`BackTab`; the others are reached with
//! the arrow keys, `Home` and `End` while the tab list has focus. The index
//! arithmetic lives in the pure [`navigate`] function; the controller turns
//! its result into a state change plus a [`FocusRequest`] for the host.
//!
use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::Theme;
use crate::ui::aria::{self, PanelAttrs, Role, TabAttrs, TabListAttrs};

/// A tab supplied by the host. The controller never mutates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tab<C> {
    pub id: String,
    pub label: String,
    pub content: C,
}

impl<C> Tab<C> {
    pub fn new(id: impl Into<String>, label: impl Into<String>, content: C) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            content,
        }
    }
}

/// The four directional commands understood by the tab list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Home,
    End,
}

impl NavKey {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(NavKey::ArrowLeft),
            KeyCode::Right => Some(NavKey::ArrowRight),
            KeyCode::Home => Some(NavKey::Home),
            KeyCode::End => Some(NavKey::End),
            _ => None,
        }
    }
}

/// Index reached from `current` by `key` in a list of `len` tabs.
///
/// Left and right wrap around. Returns `None` for an empty list.
pub fn navigate(key: NavKey, current: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current % len;
    Some(match key {
        NavKey::ArrowRight => (current + 1) % len,
        NavKey::ArrowLeft => (current + len - 1) % len,
        NavKey::Home => 0,
        NavKey::End => len - 1,
    })
}

/// Instruction to move input focus onto a tab control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusRequest {
    pub index: usize,
    pub tab_id: String,
}

#[derive(Clone, Debug)]
pub struct TabsController<C> {
    tabs: Vec<Tab<C>>,
    active: Option<String>,
    default_tab_id: Option<String>,
}

impl<C> TabsController<C> {
    /// Resolve the initial active tab: `default_tab_id` when it names a tab,
    /// else the first tab, else none.
    pub fn new(tabs: Vec<Tab<C>>, default_tab_id: Option<&str>) -> Self {
        warn_duplicates(&tabs);
        let active = default_tab_id
            .filter(|id| tabs.iter().any(|t| t.id == *id))
            .map(str::to_string)
            .or_else(|| tabs.first().map(|t| t.id.clone()));
        Self {
            tabs,
            active,
            default_tab_id: default_tab_id.map(str::to_string),
        }
    }

    pub fn tabs(&self) -> &[Tab<C>] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Position of the active tab. With duplicate ids the first occurrence wins.
    pub fn active_index(&self) -> Option<usize> {
        let id = self.active.as_deref()?;
        self.position(id)
    }

    pub fn active_tab(&self) -> Option<&Tab<C>> {
        self.active_index().map(|i| &self.tabs[i])
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    /// Activate `tab_id` if it exists. Unknown ids are ignored.
    pub fn select(&mut self, tab_id: &str) -> bool {
        if self.position(tab_id).is_none() {
            return false;
        }
        if self.active.as_deref() != Some(tab_id) {
            tracing::debug!(from = ?self.active, to = tab_id, "tab selected");
            self.active = Some(tab_id.to_string());
        }
        true
    }

    /// Apply a directional command issued while focus is on the control at
    /// `current_index`.
    pub fn on_directional_key(
        &mut self,
        key: NavKey,
        current_index: usize,
    ) -> Option<FocusRequest> {
        let index = navigate(key, current_index, self.tabs.len())?;
        let tab_id = self.tabs[index].id.clone();
        tracing::debug!(?key, from = current_index, to = index, "tab navigation");
        self.active = Some(tab_id.clone());
        Some(FocusRequest { index, tab_id })
    }

    /// Like [`TabsController::on_directional_key`], for a raw key code.
    /// Keys other than the four directional ones pass through.
    pub fn handle_key(&mut self, code: KeyCode, current_index: usize) -> Option<FocusRequest> {
        let key = NavKey::from_key_code(code)?;
        self.on_directional_key(key, current_index)
    }

    /// Take a new `default_tab_id` from the host.
    ///
    /// Only a changed value that names an existing tab moves the selection;
    /// re-supplying the same value leaves user selection alone.
    pub fn resync(&mut self, default_tab_id: Option<&str>) -> bool {
        if self.default_tab_id.as_deref() == default_tab_id {
            return false;
        }
        self.default_tab_id = default_tab_id.map(str::to_string);
        match default_tab_id {
            Some(id) => self.select(id),
            None => false,
        }
    }

    /// Replace the tab list. If the active tab disappears the first tab
    /// becomes active.
    pub fn set_tabs(&mut self, tabs: Vec<Tab<C>>) {
        warn_duplicates(&tabs);
        self.tabs = tabs;
        let still_present = self
            .active
            .as_deref()
            .is_some_and(|id| self.position(id).is_some());
        if !still_present {
            let fallback = self.tabs.first().map(|t| t.id.clone());
            tracing::debug!(from = ?self.active, to = ?fallback, "active tab removed; falling back");
            self.active = fallback;
        }
    }

    pub fn tablist_attrs(&self) -> TabListAttrs {
        TabListAttrs {
            role: Role::TabList,
        }
    }

    pub fn tab_attrs(&self) -> Vec<TabAttrs> {
        let active = self.active_index();
        self.tabs
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let selected = Some(i) == active;
                TabAttrs {
                    role: Role::Tab,
                    id: aria::tab_id(&t.id),
                    controls: aria::tabpanel_id(&t.id),
                    selected,
                    tab_index: if selected { 0 } else { -1 },
                }
            })
            .collect()
    }

    pub fn panel_attrs(&self) -> Option<PanelAttrs> {
        let tab = self.active_tab()?;
        Some(PanelAttrs {
            role: Role::TabPanel,
            id: aria::tabpanel_id(&tab.id),
            labelled_by: aria::tab_id(&tab.id),
        })
    }
}

fn warn_duplicates<C>(tabs: &[Tab<C>]) {
    for (i, t) in tabs.iter().enumerate() {
        if tabs[..i].iter().any(|earlier| earlier.id == t.id) {
            tracing::warn!(id = %t.id, "duplicate tab id; first occurrence wins");
        }
    }
}

const SEPARATOR: &str = "│";

/// Screen cells occupied by each tab label in a bar drawn at `area`.
///
/// Labels are padded by one space on each side and separated by one column.
/// Labels that fall past the right edge get a clipped or empty rect.
pub fn tab_hitboxes<'a>(area: Rect, labels: impl IntoIterator<Item = &'a str>) -> Vec<Rect> {
    let right = area.x.saturating_add(area.width);
    let mut x = area.x;
    let mut boxes = Vec::new();
    for label in labels {
        let w = u16::try_from(Span::raw(label).width())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let start = x.min(right);
        let end = x.saturating_add(w).min(right);
        boxes.push(Rect::new(start, area.y, end - start, area.height.min(1)));
        x = x
            .saturating_add(w)
            .saturating_add(Span::raw(SEPARATOR).width() as u16);
    }
    boxes
}

/// Index of the tab whose label contains `at`.
pub fn hit_test(hitboxes: &[Rect], at: Position) -> Option<usize> {
    hitboxes.iter().position(|r| r.contains(at))
}

/// Draw the tab bar and return the label hitboxes for pointer selection.
///
/// `focused` marks the active control as holding keyboard focus.
pub fn render_tab_bar<C>(
    f: &mut Frame,
    area: Rect,
    tabs: &TabsController<C>,
    focused: bool,
    theme: &Theme,
) -> Vec<Rect> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);

    let attrs = tabs.tab_attrs();
    let mut spans = Vec::with_capacity(attrs.len() * 2);
    for (i, (tab, attr)) in tabs.tabs().iter().zip(attrs.iter()).enumerate() {
        if i > 0 {
            spans.push(Span::styled(SEPARATOR, Style::default().fg(theme.border)));
        }
        let mut style = Style::default().fg(theme.text);
        if attr.selected {
            style = style
                .fg(theme.highlight_fg)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            if focused {
                style = style.add_modifier(Modifier::REVERSED);
            }
        }
        spans.push(Span::styled(format!(" {} ", tab.label), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    tab_hitboxes(inner, tabs.tabs().iter().map(|t| t.label.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Vec<Tab<&'static str>> {
        vec![
            Tab::new("tab1", "Tab 1", "Content 1"),
            Tab::new("tab2", "Tab 2", "Content 2"),
            Tab::new("tab3", "Tab 3", "Content 3"),
        ]
    }

    #[test]
    fn navigate_arithmetic_holds_for_every_start() {
        for n in 1..=6usize {
            for i in 0..n {
                assert_eq!(navigate(NavKey::ArrowRight, i, n), Some((i + 1) % n));
                assert_eq!(navigate(NavKey::ArrowLeft, i, n), Some((i + n - 1) % n));
                assert_eq!(navigate(NavKey::Home, i, n), Some(0));
                assert_eq!(navigate(NavKey::End, i, n), Some(n - 1));
            }
        }
        assert_eq!(navigate(NavKey::ArrowRight, 0, 0), None);
    }

    #[test]
    fn initial_active_is_first_without_default() {
        let tabs = TabsController::new(three(), None);
        assert_eq!(tabs.active_tab_id(), Some("tab1"));
        assert_eq!(tabs.active_tab().map(|t| t.content), Some("Content 1"));
    }

    #[test]
    fn unknown_default_falls_back_to_first() {
        let tabs = TabsController::new(three(), Some("nope"));
        assert_eq!(tabs.active_tab_id(), Some("tab1"));
        let tabs = TabsController::new(three(), Some("tab3"));
        assert_eq!(tabs.active_tab_id(), Some("tab3"));
    }

    #[test]
    fn click_selection_swaps_panel() {
        let mut tabs = TabsController::new(three(), None);
        assert!(tabs.select("tab2"));
        assert_eq!(tabs.active_tab().map(|t| t.content), Some("Content 2"));
        let attrs = tabs.tab_attrs();
        assert!(attrs[1].selected);
        assert!(!attrs[0].selected);
    }

    #[test]
    fn select_unknown_is_noop() {
        let mut tabs = TabsController::new(three(), Some("tab2"));
        assert!(!tabs.select("missing"));
        assert_eq!(tabs.active_tab_id(), Some("tab2"));
    }

    #[test]
    fn arrow_right_moves_selection_and_focus() {
        let mut tabs = TabsController::new(three(), Some("tab2"));
        let focus = tabs.handle_key(KeyCode::Right, 1).unwrap();
        assert_eq!(focus, FocusRequest { index: 2, tab_id: "tab3".into() });
        assert_eq!(tabs.active_tab_id(), Some("tab3"));

        let focus = tabs.handle_key(KeyCode::Right, 2).unwrap();
        assert_eq!(focus.tab_id, "tab1");
    }

    #[test]
    fn other_keys_pass_through() {
        let mut tabs = TabsController::new(three(), None);
        assert!(tabs.handle_key(KeyCode::Up, 0).is_none());
        assert!(tabs.handle_key(KeyCode::Char('l'), 0).is_none());
        assert_eq!(tabs.active_tab_id(), Some("tab1"));
    }

    #[test]
    fn home_end_left() {
        let mut tabs = TabsController::new(three(), Some("tab3"));
        tabs.on_directional_key(NavKey::Home, 2);
        assert_eq!(tabs.active_tab_id(), Some("tab1"));
        tabs.on_directional_key(NavKey::End, 0);
        assert_eq!(tabs.active_tab_id(), Some("tab3"));
        tabs.on_directional_key(NavKey::ArrowLeft, 0);
        assert_eq!(tabs.active_tab_id(), Some("tab3"));
    }

    #[test]
    fn aria_wiring_matches_active_tab() {
        let mut tabs = TabsController::new(three(), None);
        assert_eq!(tabs.tablist_attrs().role, Role::TabList);
        for id in ["tab1", "tab2", "tab3"] {
            tabs.select(id);
            let attrs = tabs.tab_attrs();
            let selected: Vec<_> = attrs.iter().filter(|a| a.selected).collect();
            assert_eq!(selected.len(), 1);
            assert_eq!(selected[0].id, format!("tab-{id}"));
            assert_eq!(selected[0].controls, format!("tabpanel-{id}"));
            assert_eq!(selected[0].tab_index, 0);
            assert!(attrs.iter().filter(|a| !a.selected).all(|a| a.tab_index == -1));

            let panel = tabs.panel_attrs().unwrap();
            assert_eq!(panel.role, Role::TabPanel);
            assert_eq!(panel.id, format!("tabpanel-{id}"));
            assert_eq!(panel.labelled_by, format!("tab-{id}"));
        }
    }

    #[test]
    fn empty_tabs_render_nothing() {
        let mut tabs: TabsController<()> = TabsController::new(Vec::new(), Some("x"));
        assert!(tabs.active_tab_id().is_none());
        assert!(tabs.tab_attrs().is_empty());
        assert!(tabs.panel_attrs().is_none());
        assert!(tabs.on_directional_key(NavKey::End, 0).is_none());
        assert!(!tabs.select("x"));
    }

    #[test]
    fn resync_only_on_change() {
        let mut tabs = TabsController::new(three(), Some("tab1"));
        tabs.select("tab2");
        assert!(!tabs.resync(Some("tab1")));
        assert_eq!(tabs.active_tab_id(), Some("tab2"));

        assert!(tabs.resync(Some("tab3")));
        assert_eq!(tabs.active_tab_id(), Some("tab3"));

        assert!(!tabs.resync(Some("ghost")));
        assert_eq!(tabs.active_tab_id(), Some("tab3"));
    }

    #[test]
    fn replaced_list_falls_back_to_first() {
        let mut tabs = TabsController::new(three(), Some("tab3"));
        tabs.set_tabs(vec![Tab::new("a", "A", "x"), Tab::new("tab1", "Tab 1", "y")]);
        assert_eq!(tabs.active_tab_id(), Some("a"));

        tabs.select("tab1");
        tabs.set_tabs(vec![Tab::new("b", "B", "z"), Tab::new("tab1", "Tab 1", "y")]);
        assert_eq!(tabs.active_tab_id(), Some("tab1"));

        tabs.set_tabs(Vec::new());
        assert!(tabs.active_tab_id().is_none());
    }

    #[test]
    fn duplicate_ids_keep_single_selection() {
        let tabs = TabsController::new(
            vec![
                Tab::new("dup", "First", 1),
                Tab::new("other", "Other", 2),
                Tab::new("dup", "Second", 3),
            ],
            Some("dup"),
        );
        let attrs = tabs.tab_attrs();
        assert_eq!(attrs.iter().filter(|a| a.selected).count(), 1);
        assert!(attrs[0].selected);
        assert_eq!(tabs.active_tab().map(|t| t.content), Some(1));
    }

    #[test]
    fn hitboxes_follow_label_widths() {
        let area = Rect::new(1, 1, 40, 1);
        let boxes = tab_hitboxes(area, ["Register", "View Users"]);
        assert_eq!(boxes[0], Rect::new(1, 1, 10, 1));
        assert_eq!(boxes[1], Rect::new(12, 1, 12, 1));
        assert_eq!(hit_test(&boxes, Position::new(5, 1)), Some(0));
        assert_eq!(hit_test(&boxes, Position::new(11, 1)), None);
        assert_eq!(hit_test(&boxes, Position::new(20, 1)), Some(1));
    }

    #[test]
    fn hitboxes_clip_at_right_edge() {
        let boxes = tab_hitboxes(Rect::new(0, 0, 8, 1), ["abcdef", "xyz"]);
        assert_eq!(boxes[0].width, 8);
        assert_eq!(boxes[1].width, 0);
    }

    #[test]
    fn hitboxes_saturate_on_huge_labels() {
        let huge = "x".repeat(70_000);
        let area = Rect::new(100, 0, 50, 1);
        let boxes = tab_hitboxes(area, [huge.as_str(), "Next", huge.as_str()]);
        assert_eq!(boxes[0], Rect::new(100, 0, 50, 1));
        assert_eq!(boxes[1].width, 0);
        assert_eq!(boxes[2].width, 0);
    }
}
