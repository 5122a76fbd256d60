//! Browser provisioning.
//!
//! Resolves (or downloads) a Chromium executable, launches one headless
//! instance, confirms it responds over the DevTools HTTP endpoint, then
//! terminates it. Single attempt; any failure is terminal.

pub mod fetcher;
pub mod launcher;
pub mod resolver;

use std::path::PathBuf;

use chatharvest_types::config::BrowserConfig;
use chatharvest_types::error::ProvisionError;

/// Outcome of a successful provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// The executable that was launched.
    pub executable: PathBuf,
    /// Version string reported by the DevTools endpoint.
    pub browser_version: String,
    /// Whether a snapshot was downloaded during this run.
    pub downloaded: bool,
}

/// Ensure a working headless browser: resolve or download, launch, verify,
/// terminate.
pub async fn provision(config: &BrowserConfig) -> Result<ProvisionReport, ProvisionError> {
    let (executable, downloaded) = match resolver::resolve_executable(config) {
        Some(path) => (path, false),
        None => {
            let cache_root = dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("chatharvest");
            tracing::info!(cache = %cache_root.display(), "no local browser found, downloading snapshot");
            (fetcher::ensure_chromium(&cache_root).await?, true)
        }
    };

    tracing::info!(executable = %executable.display(), "launching browser");
    let handle = launcher::launch(&executable, config.headless).await?;
    let browser_version = launcher::version(handle.devtools_port()).await?;
    tracing::info!(%browser_version, "browser instance responded");
    handle.close().await?;

    Ok(ProvisionReport {
        executable,
        browser_version,
        downloaded,
    })
}
