//! Accessibility roles and attribute sets emitted by the interactive widgets.
//!
//! The terminal has no assistive-technology tree, so these values drive the
//! status bar announcement and are what the tests assert against.

/// Widget role, mirroring the WAI-ARIA role names.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    TabList,
    Tab,
    TabPanel,
    Dialog,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::TabList => "tablist",
            Role::Tab => "tab",
            Role::TabPanel => "tabpanel",
            Role::Dialog => "dialog",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes of the tab list container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabListAttrs {
    pub role: Role,
}

/// Attributes of a single tab control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabAttrs {
    pub role: Role,
    /// `tab-{id}`
    pub id: String,
    /// `tabpanel-{id}`
    pub controls: String,
    pub selected: bool,
    /// `0` for the selected control, `-1` for every other one.
    pub tab_index: i8,
}

/// Attributes of the single rendered tab panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelAttrs {
    pub role: Role,
    /// `tabpanel-{active}`
    pub id: String,
    /// `tab-{active}`
    pub labelled_by: String,
}

/// Attributes of an open modal dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogAttrs {
    pub role: Role,
    pub aria_modal: bool,
    pub labelled_by: Option<&'static str>,
}

pub fn tab_id(id: &str) -> String {
    format!("tab-{id}")
}

pub fn tabpanel_id(id: &str) -> String {
    format!("tabpanel-{id}")
}
