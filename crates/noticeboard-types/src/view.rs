//! Rendered views, controls, and outbound effects.
//!
//! A `View` is what the engines hand to a transport: text plus optional
//! markup. Inline controls carry an `Action`, which travels back as the
//! payload of an inbound action event. Actions are encoded as short
//! colon-separated strings (`nav:next`, `admin:delete-record:42`) so any
//! transport that supports callback data can carry them verbatim.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::chat::MessageId;
use crate::record::RecordId;
use crate::section::SectionKey;

/// A user action attached to an inline control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    /// Extended static page of a section.
    SectionDetails(SectionKey),
    /// Registration / contact information for a section.
    Register(SectionKey),
    /// Start browsing the section's records.
    Schedule(SectionKey),

    NavPrev,
    NavNext,
    NavDetails,
    NavBack,
    NavExit,

    AdminPanel,
    AdminAdd,
    AdminEdit,
    AdminDelete,
    AdminCancel,
    AdminAddSection(SectionKey),
    AdminEditSection(SectionKey),
    AdminDeleteSection(SectionKey),
    AdminEditRecord(RecordId),
    AdminDeleteRecord(RecordId),
    AdminConfirmDelete,
}

impl Action {
    /// Whether this action belongs to the admin surface.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Action::AdminPanel
                | Action::AdminAdd
                | Action::AdminEdit
                | Action::AdminDelete
                | Action::AdminCancel
                | Action::AdminAddSection(_)
                | Action::AdminEditSection(_)
                | Action::AdminDeleteSection(_)
                | Action::AdminEditRecord(_)
                | Action::AdminDeleteRecord(_)
                | Action::AdminConfirmDelete
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SectionDetails(key) => write!(f, "section:details:{key}"),
            Action::Register(key) => write!(f, "section:register:{key}"),
            Action::Schedule(key) => write!(f, "section:schedule:{key}"),
            Action::NavPrev => write!(f, "nav:prev"),
            Action::NavNext => write!(f, "nav:next"),
            Action::NavDetails => write!(f, "nav:details"),
            Action::NavBack => write!(f, "nav:back"),
            Action::NavExit => write!(f, "nav:exit"),
            Action::AdminPanel => write!(f, "admin:panel"),
            Action::AdminAdd => write!(f, "admin:add"),
            Action::AdminEdit => write!(f, "admin:edit"),
            Action::AdminDelete => write!(f, "admin:delete"),
            Action::AdminCancel => write!(f, "admin:cancel"),
            Action::AdminAddSection(key) => write!(f, "admin:add:{key}"),
            Action::AdminEditSection(key) => write!(f, "admin:edit:{key}"),
            Action::AdminDeleteSection(key) => write!(f, "admin:delete:{key}"),
            Action::AdminEditRecord(id) => write!(f, "admin:edit-record:{id}"),
            Action::AdminDeleteRecord(id) => write!(f, "admin:delete-record:{id}"),
            Action::AdminConfirmDelete => write!(f, "admin:confirm-delete"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let section = |raw: &str| raw.parse::<SectionKey>();
        let record = |raw: &str| {
            raw.parse::<RecordId>()
                .map_err(|e| format!("invalid record id '{raw}': {e}"))
        };

        match parts.as_slice() {
            ["section", "details", key] => Ok(Action::SectionDetails(section(*key)?)),
            ["section", "register", key] => Ok(Action::Register(section(*key)?)),
            ["section", "schedule", key] => Ok(Action::Schedule(section(*key)?)),
            ["nav", "prev"] => Ok(Action::NavPrev),
            ["nav", "next"] => Ok(Action::NavNext),
            ["nav", "details"] => Ok(Action::NavDetails),
            ["nav", "back"] => Ok(Action::NavBack),
            ["nav", "exit"] => Ok(Action::NavExit),
            ["admin", "panel"] => Ok(Action::AdminPanel),
            ["admin", "add"] => Ok(Action::AdminAdd),
            ["admin", "edit"] => Ok(Action::AdminEdit),
            ["admin", "delete"] => Ok(Action::AdminDelete),
            ["admin", "cancel"] => Ok(Action::AdminCancel),
            ["admin", "add", key] => Ok(Action::AdminAddSection(section(*key)?)),
            ["admin", "edit", key] => Ok(Action::AdminEditSection(section(*key)?)),
            ["admin", "delete", key] => Ok(Action::AdminDeleteSection(section(*key)?)),
            ["admin", "edit-record", id] => Ok(Action::AdminEditRecord(record(*id)?)),
            ["admin", "delete-record", id] => Ok(Action::AdminDeleteRecord(record(*id)?)),
            ["admin", "confirm-delete"] => Ok(Action::AdminConfirmDelete),
            _ => Err(format!("unknown action: '{s}'")),
        }
    }
}

impl TryFrom<String> for Action {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

/// An inline control (button) attached to a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub label: String,
    pub action: Action,
    /// Disabled controls are rendered but should not be pressable.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Control {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
            enabled: true,
        }
    }

    pub fn disabled(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
            enabled: false,
        }
    }
}

/// Markup attached to a view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "rows", rename_all = "snake_case")]
pub enum Markup {
    #[default]
    None,
    /// Inline controls, row by row.
    Inline(Vec<Vec<Control>>),
    /// Persistent menu of labels; pressing one sends the label as plain text.
    Menu(Vec<Vec<String>>),
}

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub text: String,
    #[serde(default)]
    pub markup: Markup,
}

impl View {
    /// Plain text view with no markup.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: Markup::None,
        }
    }

    /// View with inline controls.
    pub fn inline(text: impl Into<String>, rows: Vec<Vec<Control>>) -> Self {
        Self {
            text: text.into(),
            markup: Markup::Inline(rows),
        }
    }

    /// Inline controls flattened in display order.
    pub fn controls(&self) -> Vec<&Control> {
        match &self.markup {
            Markup::Inline(rows) => rows.iter().flatten().collect(),
            _ => Vec::new(),
        }
    }

    /// Find the first control bound to `action`.
    pub fn control(&self, action: Action) -> Option<&Control> {
        self.controls().into_iter().find(|c| c.action == action)
    }
}

/// One effect a transport performed on behalf of the engines.
///
/// Used by recording transports (HTTP outbox, tests) to expose what a chat
/// would have seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outbound {
    Send { message_id: MessageId, view: View },
    Edit { message_id: MessageId, view: View },
    Delete { message_id: MessageId },
    Notice { text: String },
}
