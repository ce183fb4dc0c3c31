//! Section keys.
//!
//! A section is a content category with its own independent record
//! collection. The set is fixed; the user-facing labels live in the catalog
//! in `noticeboard-core`.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Internal key of a content section.
///
/// Maps to the CHECK constraint on `records.section` in the SQLite schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Events,
    Edu,
    Groups,
    Courses,
    Lectures,
    Films,
    Consult,
    Conf,
    Projects,
    Library,
}

impl SectionKey {
    /// Every section, in main-menu order.
    pub const ALL: [SectionKey; 10] = [
        SectionKey::Events,
        SectionKey::Edu,
        SectionKey::Groups,
        SectionKey::Courses,
        SectionKey::Lectures,
        SectionKey::Films,
        SectionKey::Consult,
        SectionKey::Conf,
        SectionKey::Projects,
        SectionKey::Library,
    ];

    /// Stable storage/wire key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Events => "events",
            SectionKey::Edu => "edu",
            SectionKey::Groups => "groups",
            SectionKey::Courses => "courses",
            SectionKey::Lectures => "lectures",
            SectionKey::Films => "films",
            SectionKey::Consult => "consult",
            SectionKey::Conf => "conf",
            SectionKey::Projects => "projects",
            SectionKey::Library => "library",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("invalid section: '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_key_roundtrip() {
        for key in SectionKey::ALL {
            let parsed: SectionKey = key.to_string().parse().unwrap();
            assert_eq!(parsed, key);
        }
    }

    #[test]
    fn test_section_key_parse_is_case_insensitive() {
        assert_eq!("Lectures".parse::<SectionKey>().unwrap(), SectionKey::Lectures);
        assert!("cinema".parse::<SectionKey>().is_err());
    }

    #[test]
    fn test_section_key_serde() {
        let json = serde_json::to_string(&SectionKey::Conf).unwrap();
        assert_eq!(json, "\"conf\"");
    }
}
