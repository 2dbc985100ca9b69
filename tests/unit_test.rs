// Unit tests for the reusable widgets through the public API.

use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Position, Rect};

use regdesk::ui::aria::Role;
use regdesk::ui::host::{Document, Overflow, Subscription};
use regdesk::ui::modal::{ModalController, PressTarget, classify_press};
use regdesk::ui::tabs::{NavKey, Tab, TabsController, hit_test, tab_hitboxes};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn tabs() -> Vec<Tab<&'static str>> {
    vec![
        Tab::new("tab1", "Tab 1", "Content 1"),
        Tab::new("tab2", "Tab 2", "Content 2"),
        Tab::new("tab3", "Tab 3", "Content 3"),
    ]
}

// 1) Default tab and clicking
#[test]
fn default_tab_then_click_changes_panel() {
    let mut c = TabsController::new(tabs(), Some("tab2"));
    assert_eq!(c.active_tab().map(|t| t.content), Some("Content 2"));

    assert!(c.select("tab3"));
    assert_eq!(c.active_tab().map(|t| t.content), Some("Content 3"));
    let panel = c.panel_attrs().unwrap();
    assert_eq!(panel.id, "tabpanel-tab3");
    assert_eq!(panel.labelled_by, "tab-tab3");
    assert_eq!(panel.role, Role::TabPanel);
}

// 2) Roving tabindex follows keyboard navigation
#[test]
fn keyboard_navigation_wraps_and_moves_roving_tabindex() {
    let mut c = TabsController::new(tabs(), None);

    let req = c.on_directional_key(NavKey::ArrowLeft, 0).unwrap();
    assert_eq!((req.index, req.tab_id.as_str()), (2, "tab3"));

    let attrs = c.tab_attrs();
    let indices: Vec<i8> = attrs.iter().map(|a| a.tab_index).collect();
    assert_eq!(indices, vec![-1, -1, 0]);
    assert_eq!(attrs.iter().filter(|a| a.selected).count(), 1);
    assert_eq!(attrs[2].controls, "tabpanel-tab3");

    let req = c.handle_key(KeyCode::Right, req.index).unwrap();
    assert_eq!(req.tab_id, "tab1");
    assert!(c.handle_key(KeyCode::Enter, 0).is_none());
    assert_eq!(c.active_tab_id(), Some("tab1"));
}

// 3) Host-driven resync
#[test]
fn resync_only_reacts_to_changed_defaults() {
    let mut c = TabsController::new(tabs(), Some("tab1"));
    c.select("tab3");
    assert!(!c.resync(Some("tab1")));
    assert_eq!(c.active_tab_id(), Some("tab3"));
    assert!(c.resync(Some("tab2")));
    assert_eq!(c.active_tab_id(), Some("tab2"));
    assert!(!c.resync(Some("nope")));
    assert_eq!(c.active_tab_id(), Some("tab2"));
}

#[test]
fn hitboxes_line_up_with_labels() {
    let boxes = tab_hitboxes(Rect::new(1, 1, 40, 1), ["Tab 1", "Tab 2"]);
    assert_eq!(boxes, vec![Rect::new(1, 1, 7, 1), Rect::new(9, 1, 7, 1)]);
    assert_eq!(hit_test(&boxes, Position::new(10, 1)), Some(1));
    assert_eq!(hit_test(&boxes, Position::new(8, 1)), None);
}

// 4) Modal lifecycle against the document
#[test]
fn modal_escape_and_backdrop_request_close() {
    let doc = Document::new();
    let closes = Rc::new(Cell::new(0));
    let counter = closes.clone();
    let mut modal = ModalController::new(&doc, move || counter.set(counter.get() + 1));

    assert!(!modal.reconcile(false));
    assert_eq!(doc.dispatch_key(&key(KeyCode::Esc)), 0);
    assert_eq!(closes.get(), 0);

    assert!(modal.reconcile(true));
    assert!(modal.listeners_active());
    assert_eq!(doc.overflow(), Overflow::Hidden);

    doc.dispatch_key(&key(KeyCode::Char('a')));
    assert_eq!(closes.get(), 0);
    doc.dispatch_key(&key(KeyCode::Esc));
    assert_eq!(closes.get(), 1);

    // not laid out yet: presses are ignored
    doc.dispatch_pointer(Position::new(0, 0));
    assert_eq!(closes.get(), 1);

    modal.set_content_area(Rect::new(10, 5, 20, 6));
    doc.dispatch_pointer(Position::new(15, 7));
    assert_eq!(closes.get(), 1);
    doc.dispatch_pointer(Position::new(2, 2));
    assert_eq!(closes.get(), 2);

    assert!(modal.reconcile(false));
    assert_eq!(doc.key_listener_count(), 0);
    assert_eq!(doc.pointer_listener_count(), 0);
    assert_eq!(doc.overflow(), Overflow::Auto);
    doc.dispatch_key(&key(KeyCode::Esc));
    assert_eq!(closes.get(), 2);
}

#[test]
fn dialog_attrs_only_while_open() {
    let doc = Document::new();
    let mut modal = ModalController::new(&doc, || {});
    assert!(modal.attrs(true).is_none());
    modal.reconcile(true);
    let attrs = modal.attrs(true).unwrap();
    assert_eq!(attrs.role, Role::Dialog);
    assert!(attrs.aria_modal);
    assert_eq!(attrs.labelled_by, Some("modal-title"));
    assert_eq!(modal.attrs(false).unwrap().labelled_by, None);
}

#[test]
fn press_classification() {
    let area = Some(Rect::new(0, 0, 4, 4));
    assert_eq!(classify_press(area, Position::new(3, 3)), PressTarget::Inside);
    assert_eq!(classify_press(area, Position::new(4, 0)), PressTarget::Outside);
    assert_eq!(classify_press(None, Position::new(0, 0)), PressTarget::Unknown);
}

// 5) Subscriptions restore what they found
#[test]
fn nested_scroll_locks_restore_in_order() {
    let doc = Document::new();
    let outer = Subscription::new(&doc).lock_scroll();
    let inner = Subscription::new(&doc).lock_scroll();
    assert!(doc.is_scroll_locked());
    inner.release();
    assert!(doc.is_scroll_locked());
    drop(outer);
    assert_eq!(doc.overflow(), Overflow::Auto);
}
