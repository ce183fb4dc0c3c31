//! Global configuration types for Noticeboard.
//!
//! `BoardConfig` represents the top-level `config.toml` that controls the
//! admin allow-list, navigation boundary policy, static page location, and
//! the HTTP adapter.

use serde::{Deserialize, Serialize};

use std::path::PathBuf;

/// Top-level configuration.
///
/// Loaded from `~/.noticeboard/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Actor ids allowed to use the admin panel.
    #[serde(default)]
    pub admins: Vec<i64>,

    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Directory holding `{section}.txt` pages. Defaults to `{data_dir}/texts`.
    #[serde(default)]
    pub texts_dir: Option<PathBuf>,

    /// Text shown for "Register" and "Contact administrator".
    #[serde(default = "default_contact")]
    pub contact: String,

    #[serde(default)]
    pub http: HttpConfig,

    /// Capacity of the inbound event queue.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_contact() -> String {
    "Please write to the administrator to register.".to_string()
}

fn default_event_buffer() -> usize {
    256
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            admins: Vec::new(),
            navigation: NavigationConfig::default(),
            texts_dir: None,
            contact: default_contact(),
            http: HttpConfig::default(),
            event_buffer: default_event_buffer(),
        }
    }
}

/// Navigation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default)]
    pub boundary: BoundaryPolicy,
}

/// What "next" on the last record (and "previous" on the first) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Treat the snapshot as circular.
    #[default]
    Wrap,
    /// Stop at the ends; the arrow at a boundary is rendered disabled.
    Clamp,
}

/// HTTP adapter settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bearer token required on `/api/v1` routes when set.
    #[serde(default)]
    pub api_token: Option<String>,
}
