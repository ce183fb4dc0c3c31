//! Configuration loader for Noticeboard.
//!
//! Reads `config.toml` from the data directory (`~/.noticeboard/` in
//! production) into [`BoardConfig`]. Falls back to defaults when the file is
//! missing or malformed.

use std::path::Path;

use noticeboard_types::config::BoardConfig;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`BoardConfig::default()`].
/// - Unreadable or unparsable file: a warning and the default.
pub async fn load_board_config(data_dir: &Path) -> BoardConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return BoardConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return BoardConfig::default();
        }
    };

    match toml::from_str::<BoardConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            BoardConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noticeboard_types::config::BoundaryPolicy;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_board_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_board_config(tmp.path()).await;
        assert!(config.admins.is_empty());
        assert_eq!(config.navigation.boundary, BoundaryPolicy::Wrap);
        assert_eq!(config.event_buffer, 256);
    }

    #[tokio::test]
    async fn load_board_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
admins = [1001, 1002]
contact = "Call the front desk."

[navigation]
boundary = "clamp"

[http]
api_token = "secret"
"#,
        )
        .await
        .unwrap();

        let config = load_board_config(tmp.path()).await;
        assert_eq!(config.admins, vec![1001, 1002]);
        assert_eq!(config.navigation.boundary, BoundaryPolicy::Clamp);
        assert_eq!(config.contact, "Call the front desk.");
        assert_eq!(config.http.api_token.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn load_board_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "admins = \"everyone\"")
            .await
            .unwrap();

        let config = load_board_config(tmp.path()).await;
        assert!(config.admins.is_empty());
    }
}
