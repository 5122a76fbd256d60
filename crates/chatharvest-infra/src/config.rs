//! Configuration loader.
//!
//! Reads `chatharvest.toml` from the working directory (or an explicit
//! path) and deserializes it into [`HarvestConfig`]. Falls back to defaults
//! when the file is missing or malformed.

use std::path::Path;

use chatharvest_types::config::HarvestConfig;

/// Default config file name, resolved relative to the working directory.
pub const CONFIG_FILE: &str = "chatharvest.toml";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`HarvestConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - Otherwise returns the parsed config (missing fields take defaults).
pub async fn load_config(path: &Path) -> HarvestConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config file at {}, using defaults", path.display());
            return HarvestConfig::default();
        }
        Err(err) => {
            tracing::warn!("failed to read {}: {err}, using defaults", path.display());
            return HarvestConfig::default();
        }
    };

    match toml::from_str::<HarvestConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("failed to parse {}: {err}, using defaults", path.display());
            HarvestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE)).await;
        assert_eq!(config, HarvestConfig::default());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        tokio::fs::write(
            &path,
            r#"
client_id = "scraper"
session_dir = "/var/lib/chatharvest/session"

[browser]
headless = false
executable_path = "/usr/bin/chromium"
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.client_id, "scraper");
        assert_eq!(
            config.session_dir,
            PathBuf::from("/var/lib/chatharvest/session")
        );
        assert!(!config.browser.headless);
        assert_eq!(
            config.browser.executable_path,
            Some(PathBuf::from("/usr/bin/chromium"))
        );
        // Unset fields keep defaults.
        assert_eq!(config.output_dir, PathBuf::from("static"));
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config, HarvestConfig::default());
    }
}
