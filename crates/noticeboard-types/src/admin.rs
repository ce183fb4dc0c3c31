//! Admin mutation phase.
//!
//! One phase per admin chat. Each non-idle phase carries its own target, so a
//! pending phase can never exist without knowing what it applies to.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::record::RecordId;
use crate::section::SectionKey;

/// The pending admin operation, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum AdminPhase {
    #[default]
    Idle,
    /// Next text message becomes the body of a new record in `section`.
    AwaitingNewContent { section: SectionKey },
    /// Next text message becomes the details of `record_id`.
    AwaitingDetailEdit { record_id: RecordId },
    /// Waiting for explicit confirmation before deleting `record_id`.
    AwaitingDeleteConfirmation { record_id: RecordId },
}

impl AdminPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, AdminPhase::Idle)
    }

    /// Whether the next plain-text message is the payload of this phase.
    pub fn awaits_text(&self) -> bool {
        matches!(
            self,
            AdminPhase::AwaitingNewContent { .. } | AdminPhase::AwaitingDetailEdit { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            AdminPhase::Idle => "idle",
            AdminPhase::AwaitingNewContent { .. } => "awaiting-new-content",
            AdminPhase::AwaitingDetailEdit { .. } => "awaiting-detail-edit",
            AdminPhase::AwaitingDeleteConfirmation { .. } => "awaiting-delete-confirmation",
        }
    }
}

impl fmt::Display for AdminPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
