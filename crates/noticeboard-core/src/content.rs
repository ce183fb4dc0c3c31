//! Static section pages.
//!
//! Each section has an informational page (and optionally an extended
//! "details" page) maintained outside the record store. The filesystem
//! implementation lives in noticeboard-infra.

use std::future::Future;

use noticeboard_types::section::SectionKey;

use crate::catalog;

/// Source of static section pages.
pub trait SectionContent: Send + Sync {
    /// The section's info page, or `None` when it has not been provided.
    fn page(&self, section: SectionKey) -> impl Future<Output = Option<String>> + Send;

    /// The section's extended page, or `None` when it has not been provided.
    fn details_page(&self, section: SectionKey) -> impl Future<Output = Option<String>> + Send;
}

/// Fallback text for a missing page.
pub fn unavailable_notice(section: SectionKey) -> String {
    format!(
        "Section '{}' is temporarily unavailable.",
        catalog::display_name(section)
    )
}
