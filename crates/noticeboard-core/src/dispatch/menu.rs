//! Main menu and section info pages.

use noticeboard_types::section::SectionKey;
use noticeboard_types::view::{Action, Control, Markup, View};

use crate::catalog::{self, CONTACT_LABEL};
use crate::content::unavailable_notice;

const MENU_COLUMNS: usize = 2;

/// The persistent main menu: every section label, then the contact entry.
pub fn main_menu() -> View {
    let labels: Vec<&str> = catalog::sections().map(|(_, label)| label).collect();
    let mut rows: Vec<Vec<String>> = labels
        .chunks(MENU_COLUMNS)
        .map(|chunk| chunk.iter().map(|label| label.to_string()).collect())
        .collect();
    rows.push(vec![CONTACT_LABEL.to_string()]);

    View {
        text: "Welcome! Choose a section:".to_string(),
        markup: Markup::Menu(rows),
    }
}

/// A section's info page with its Details / Register / Schedule controls.
///
/// `text` is the page loaded from section content; a missing page renders
/// the unavailable notice instead.
pub fn section_page(section: SectionKey, text: Option<String>) -> View {
    let text = text.unwrap_or_else(|| unavailable_notice(section));
    View::inline(
        text,
        vec![
            vec![
                Control::new("ℹ️ Details", Action::SectionDetails(section)),
                Control::new("📝 Register", Action::Register(section)),
            ],
            vec![Control::new("🗓 Schedule", Action::Schedule(section))],
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_menu_lists_everything() {
        let Markup::Menu(rows) = main_menu().markup else {
            panic!("main menu must be a persistent menu");
        };
        let labels: Vec<&String> = rows.iter().flatten().collect();
        assert_eq!(labels.len(), SectionKey::ALL.len() + 1);
        for key in SectionKey::ALL {
            assert!(labels.iter().any(|l| *l == catalog::display_name(key)));
        }
        assert_eq!(rows.last().unwrap(), &vec![CONTACT_LABEL.to_string()]);
    }

    #[test]
    fn test_section_page_controls() {
        let view = section_page(SectionKey::Films, Some("Every Friday".to_string()));
        assert_eq!(view.text, "Every Friday");
        assert!(view.control(Action::Schedule(SectionKey::Films)).is_some());
        assert!(view.control(Action::Register(SectionKey::Films)).is_some());
        assert!(view.control(Action::SectionDetails(SectionKey::Films)).is_some());
    }

    #[test]
    fn test_missing_page_is_unavailable() {
        let view = section_page(SectionKey::Conf, None);
        assert_eq!(
            view.text,
            "Section '🌐 Conferences' is temporarily unavailable."
        );
    }
}
