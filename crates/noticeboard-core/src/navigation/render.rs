//! Views for the navigation states.

use noticeboard_types::config::BoundaryPolicy;
use noticeboard_types::record::Record;
use noticeboard_types::section::SectionKey;
use noticeboard_types::view::{Action, Control, View};

use crate::catalog;
use crate::state::{SessionState, ViewMode};

pub const PREV_LABEL: &str = "⬅️ Previous";
pub const NEXT_LABEL: &str = "Next ➡️";
pub const DETAILS_LABEL: &str = "ℹ️ Details";
pub const BACK_LABEL: &str = "🔙 Back";
pub const EXIT_LABEL: &str = "↩️ Back to section";

/// Render whatever the session is currently showing.
///
/// Returns `None` when the session is not browsing.
pub fn render(session: &SessionState, policy: BoundaryPolicy) -> Option<View> {
    let section = session.section()?;
    let cursor = session.cursor()?;
    let record = session.current()?;
    let view = match session.mode()? {
        ViewMode::Browsing => record_view(section, record, cursor, session.len(), policy),
        ViewMode::Details => details_view(record.details.as_deref().unwrap_or_default()),
    };
    Some(view)
}

/// The browsing view of `record` at position `cursor` of `len`.
pub fn record_view(
    section: SectionKey,
    record: &Record,
    cursor: usize,
    len: usize,
    policy: BoundaryPolicy,
) -> View {
    let text = format!(
        "{}\n{}\n\n{}",
        catalog::display_name(section),
        position(cursor, len),
        record.body
    );

    let (prev_enabled, next_enabled) = match policy {
        BoundaryPolicy::Wrap => (len > 1, len > 1),
        BoundaryPolicy::Clamp => (cursor > 0, cursor + 1 < len),
    };

    let mut rows = vec![vec![
        arrow(PREV_LABEL, Action::NavPrev, prev_enabled),
        arrow(NEXT_LABEL, Action::NavNext, next_enabled),
    ]];
    if record.has_details() {
        rows.push(vec![Control::new(DETAILS_LABEL, Action::NavDetails)]);
    }
    rows.push(vec![Control::new(EXIT_LABEL, Action::NavExit)]);

    View::inline(text, rows)
}

/// The details view: the text and a single back control.
pub fn details_view(details: &str) -> View {
    View::inline(
        details,
        vec![vec![Control::new(BACK_LABEL, Action::NavBack)]],
    )
}

/// 1-indexed position label, e.g. `1/3`.
pub fn position(cursor: usize, len: usize) -> String {
    format!("{}/{}", cursor + 1, len)
}

fn arrow(label: &str, action: Action, enabled: bool) -> Control {
    if enabled {
        Control::new(label, action)
    } else {
        Control::disabled(label, action)
    }
}
