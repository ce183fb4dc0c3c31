//! Content records.
//!
//! A record is one schedule or announcement entry belonging to a section,
//! with optional extended details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::section::SectionKey;

/// Store-assigned record identifier.
///
/// Monotonically increasing, globally unique across sections, and stable for
/// the lifetime of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecordId)
    }
}

/// A single content record.
///
/// Records are listed newest first by `created_at`; `created_at` is used only
/// for that ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub section: SectionKey,
    pub body: String,
    /// Extended information. `None` means the record has no details.
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Whether the record carries extended details.
    pub fn has_details(&self) -> bool {
        self.details.is_some()
    }
}

/// Interpret operator input for a details edit.
///
/// A literal `-` clears the details; anything else is stored verbatim.
pub fn details_from_input(input: &str) -> Option<String> {
    if input == "-" {
        None
    } else {
        Some(input.to_string())
    }
}
