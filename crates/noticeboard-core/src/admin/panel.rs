//! Views for the admin surface: the panel, pickers, and step outcomes.

use noticeboard_types::record::Record;
use noticeboard_types::section::SectionKey;
use noticeboard_types::view::{Action, Control, View};

use crate::admin::engine::AdminOutcome;
use crate::catalog;

const PICKER_PREVIEW_CHARS: usize = 40;

/// What a section or record picker leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Add,
    Edit,
    Delete,
}

impl Purpose {
    fn section_action(self, section: SectionKey) -> Action {
        match self {
            Purpose::Add => Action::AdminAddSection(section),
            Purpose::Edit => Action::AdminEditSection(section),
            Purpose::Delete => Action::AdminDeleteSection(section),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Purpose::Add => "add an entry to",
            Purpose::Edit => "edit details in",
            Purpose::Delete => "delete an entry from",
        }
    }
}

pub fn panel() -> View {
    panel_with("🛠 Admin panel")
}

fn panel_with(text: &str) -> View {
    View::inline(
        text,
        vec![
            vec![Control::new("➕ Add", Action::AdminAdd)],
            vec![Control::new("✏️ Edit details", Action::AdminEdit)],
            vec![Control::new("🗑 Delete", Action::AdminDelete)],
        ],
    )
}

/// One control per catalog section, then a way back to the panel.
pub fn section_picker(purpose: Purpose) -> View {
    let mut rows: Vec<Vec<Control>> = catalog::sections()
        .map(|(key, label)| vec![Control::new(label, purpose.section_action(key))])
        .collect();
    rows.push(vec![back_to_panel()]);
    View::inline(format!("Choose a section to {}:", purpose.verb()), rows)
}

/// One control per record of `section`, newest first.
pub fn record_picker(purpose: Purpose, section: SectionKey, records: &[Record]) -> View {
    let label = catalog::display_name(section);
    let back = match purpose {
        Purpose::Delete => Action::AdminDelete,
        _ => Action::AdminEdit,
    };

    let mut rows: Vec<Vec<Control>> = records
        .iter()
        .map(|record| {
            let action = match purpose {
                Purpose::Delete => Action::AdminDeleteRecord(record.id),
                _ => Action::AdminEditRecord(record.id),
            };
            vec![Control::new(preview(record), action)]
        })
        .collect();
    rows.push(vec![Control::new("🔙 Back", back)]);

    let text = if records.is_empty() {
        format!("{label} has no entries.")
    } else {
        format!("{label}: choose an entry.")
    };
    View::inline(text, rows)
}

/// Render the result of an admin step.
pub fn outcome(outcome: &AdminOutcome) -> View {
    match outcome {
        AdminOutcome::AwaitingContent { section } => View::inline(
            format!(
                "Send the text of the new entry for {}.",
                catalog::display_name(*section)
            ),
            vec![vec![cancel()]],
        ),
        AdminOutcome::Created { record_id, section } => panel_with(&format!(
            "✅ Entry #{record_id} added to {}.",
            catalog::display_name(*section)
        )),
        AdminOutcome::AwaitingDetails { record } => {
            let current = record.details.as_deref().unwrap_or("(none)");
            View::inline(
                format!(
                    "Entry #{}:\n{}\n\nCurrent details:\n{current}\n\nSend the new details, or \"-\" to remove them.",
                    record.id, record.body
                ),
                vec![vec![cancel()]],
            )
        }
        AdminOutcome::DetailsUpdated { record_id, details } => {
            let text = match details {
                Some(_) => format!("✅ Details of entry #{record_id} updated."),
                None => format!("✅ Details of entry #{record_id} removed."),
            };
            panel_with(&text)
        }
        AdminOutcome::AwaitingConfirmation { record } => View::inline(
            format!("Delete entry #{}?\n\n{}", record.id, record.body),
            vec![vec![
                Control::new("✅ Yes, delete", Action::AdminConfirmDelete),
                cancel(),
            ]],
        ),
        AdminOutcome::Deleted(record_id) => panel_with(&format!("🗑 Entry #{record_id} deleted.")),
        AdminOutcome::Cancelled => panel_with("Cancelled."),
    }
}

fn cancel() -> Control {
    Control::new("✖️ Cancel", Action::AdminCancel)
}

fn back_to_panel() -> Control {
    Control::new("🔙 Back", Action::AdminPanel)
}

fn preview(record: &Record) -> String {
    let first_line = record.body.lines().next().unwrap_or_default();
    let mut text: String = first_line.chars().take(PICKER_PREVIEW_CHARS).collect();
    if first_line.chars().count() > PICKER_PREVIEW_CHARS {
        text.push('…');
    }
    format!("#{} {text}", record.id)
}
