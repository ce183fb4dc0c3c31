//! Section catalog: user-facing labels for the fixed set of sections.
//!
//! Pure lookup with no state. An unknown label resolves to `None`; callers
//! treat that as "not a section" and ignore the input.

use noticeboard_types::section::SectionKey;

/// Menu label for the "contact the administrator" entry of the main menu.
pub const CONTACT_LABEL: &str = "📩 Contact administrator";

/// Label table, in main-menu order.
const SECTIONS: [(SectionKey, &str); 10] = [
    (SectionKey::Events, "📅 Upcoming events"),
    (SectionKey::Edu, "🎓 Educational programs"),
    (SectionKey::Groups, "👥 Specialist groups"),
    (SectionKey::Courses, "🏫 Courses for everyone"),
    (SectionKey::Lectures, "🎤 Lecture hall"),
    (SectionKey::Films, "🎬 Film club"),
    (SectionKey::Consult, "💬 Counselling"),
    (SectionKey::Conf, "🌐 Conferences"),
    (SectionKey::Projects, "🚀 Academy projects"),
    (SectionKey::Library, "📚 Materials library"),
];

/// Resolve a menu label to its section.
pub fn resolve(label: &str) -> Option<SectionKey> {
    let label = label.trim();
    SECTIONS
        .iter()
        .find(|(_, candidate)| *candidate == label)
        .map(|(key, _)| *key)
}

/// Menu label for a section.
pub fn display_name(key: SectionKey) -> &'static str {
    SECTIONS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, label)| *label)
        .unwrap_or("")
}

/// All sections with their labels, in menu order.
pub fn sections() -> impl Iterator<Item = (SectionKey, &'static str)> {
    SECTIONS.iter().copied()
}
