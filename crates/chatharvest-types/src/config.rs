//! Configuration for the chatharvest tools.
//!
//! Replaces the hard-coded client id and paths of earlier iterations with an
//! explicit struct passed to each entry point at construction time. Loaded
//! from `chatharvest.toml` by the infra layer; every field has a default so
//! a missing or partial file still yields a working configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration shared by all three entry points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Fixed identifier naming the persisted authentication profile.
    pub client_id: String,
    /// Directory holding the persisted session for `client_id`.
    pub session_dir: PathBuf,
    /// Directory receiving the QR and messages output files.
    pub output_dir: PathBuf,
    /// Browser automation options.
    pub browser: BrowserConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            client_id: "client-one".to_string(),
            session_dir: PathBuf::from("session"),
            output_dir: PathBuf::from("static"),
            browser: BrowserConfig::default(),
        }
    }
}

impl HarvestConfig {
    /// Path of the QR output file.
    pub fn qr_output_path(&self) -> PathBuf {
        self.output_dir.join("qr_code.txt")
    }

    /// Path of the messages output file for a group identifier.
    pub fn messages_output_path(&self, group_id: &str) -> PathBuf {
        self.output_dir.join(format!("messages_{group_id}.json"))
    }
}

/// Options consumed by the browser automation adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Override the browser executable instead of resolving one.
    pub executable_path: Option<PathBuf>,
    /// Override the embedded bridge script (development use).
    pub bridge_script: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable_path: None,
            bridge_script: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarvestConfig::default();
        assert_eq!(config.client_id, "client-one");
        assert_eq!(config.session_dir, PathBuf::from("session"));
        assert_eq!(config.output_dir, PathBuf::from("static"));
        assert!(config.browser.headless);
        assert!(config.browser.executable_path.is_none());
    }

    #[test]
    fn test_output_paths() {
        let config = HarvestConfig::default();
        assert_eq!(config.qr_output_path(), PathBuf::from("static/qr_code.txt"));
        assert_eq!(
            config.messages_output_path("12345@g.us"),
            PathBuf::from("static/messages_12345@g.us.json")
        );
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: HarvestConfig = toml::from_str(
            r#"
client_id = "other-client"

[browser]
headless = false
"#,
        )
        .unwrap();
        assert_eq!(config.client_id, "other-client");
        assert!(!config.browser.headless);
        // Unset fields fall back to defaults.
        assert_eq!(config.output_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: HarvestConfig = toml::from_str("").unwrap();
        assert_eq!(config, HarvestConfig::default());
    }
}
