//! Application state shared by the CLI handlers.

use std::path::Path;

use chatharvest_infra::config::load_config;
use chatharvest_types::config::HarvestConfig;

/// Configuration resolved once per invocation and passed to each handler.
#[derive(Clone)]
pub struct AppState {
    pub config: HarvestConfig,
}

impl AppState {
    /// Load configuration from `config_path` (defaults apply when absent).
    pub async fn init(config_path: &Path) -> anyhow::Result<Self> {
        let config = load_config(config_path).await;
        tracing::debug!(
            client_id = %config.client_id,
            session_dir = %config.session_dir.display(),
            output_dir = %config.output_dir.display(),
            "configuration loaded"
        );
        Ok(Self { config })
    }
}
