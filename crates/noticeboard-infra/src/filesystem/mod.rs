//! Filesystem adapters for Noticeboard.
//!
//! Section pages are plain UTF-8 files in a texts directory:
//! `{texts_dir}/{section}.txt` for the info page and
//! `{texts_dir}/{section}_details.txt` for the extended page.

use std::path::{Path, PathBuf};

use noticeboard_core::content::SectionContent;
use noticeboard_types::section::SectionKey;

/// Section pages read from a directory on every request, so edits to the
/// files show up without a restart.
#[derive(Debug, Clone)]
pub struct FsSectionContent {
    dir: PathBuf,
}

impl FsSectionContent {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the info page for `section`.
    pub fn page_path(&self, section: SectionKey) -> PathBuf {
        self.dir.join(format!("{section}.txt"))
    }

    /// Path of the extended page for `section`.
    pub fn details_path(&self, section: SectionKey) -> PathBuf {
        self.dir.join(format!("{section}_details.txt"))
    }

    async fn read(path: &Path) -> Option<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Some(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No section page at {}", path.display());
                None
            }
            Err(err) => {
                tracing::warn!("Failed to read {}: {err}", path.display());
                None
            }
        }
    }
}

impl SectionContent for FsSectionContent {
    async fn page(&self, section: SectionKey) -> Option<String> {
        Self::read(&self.page_path(section)).await
    }

    async fn details_page(&self, section: SectionKey) -> Option<String> {
        Self::read(&self.details_path(section)).await
    }
}

/// Resolve the data directory for Noticeboard.
///
/// Priority:
/// 1. `NOTICEBOARD_DATA_DIR` environment variable
/// 2. `~/.noticeboard`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NOTICEBOARD_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".noticeboard");
    }

    PathBuf::from(".noticeboard")
}

/// Directory holding section pages: the configured one, else `{data_dir}/texts`.
pub fn texts_dir(data_dir: &Path, configured: Option<&Path>) -> PathBuf {
    match configured {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => data_dir.join(dir),
        None => data_dir.join("texts"),
    }
}
