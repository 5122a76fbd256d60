//! Launching and verifying a headless browser instance.
//!
//! The browser is started with `--remote-debugging-port=0`; the kernel
//! assigns a port which the browser advertises on stderr as a
//! `DevTools listening on ws://...` line. Responsiveness is confirmed via
//! the DevTools HTTP version endpoint.

use std::path::Path;
use std::time::Duration;

use chatharvest_types::error::ProvisionError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, Command};

/// How long to wait for the DevTools endpoint to appear on stderr.
const LAUNCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A running browser instance.
#[derive(Debug)]
pub struct BrowserHandle {
    child: Child,
    ws_endpoint: String,
    devtools_port: u16,
    // Removed with the handle; the browser must not touch a real profile.
    _user_data: tempfile::TempDir,
}

impl BrowserHandle {
    /// The advertised DevTools websocket endpoint.
    pub fn ws_endpoint(&self) -> &str {
        &self.ws_endpoint
    }

    /// TCP port of the DevTools HTTP/websocket server.
    pub fn devtools_port(&self) -> u16 {
        self.devtools_port
    }

    /// Terminate the instance and wait for it to exit.
    pub async fn close(mut self) -> Result<(), ProvisionError> {
        self.child
            .start_kill()
            .map_err(|e| ProvisionError::Launch(e.to_string()))?;
        self.child
            .wait()
            .await
            .map_err(|e| ProvisionError::Launch(e.to_string()))?;
        Ok(())
    }
}

/// Launch one browser instance and wait for its DevTools endpoint.
pub async fn launch(executable: &Path, headless: bool) -> Result<BrowserHandle, ProvisionError> {
    let user_data =
        tempfile::tempdir().map_err(|e| ProvisionError::Launch(e.to_string()))?;

    let mut command = Command::new(executable);
    if headless {
        command.arg("--headless=new");
    }
    command
        .arg("--remote-debugging-port=0")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-gpu")
        .arg(format!("--user-data-dir={}", user_data.path().display()))
        .arg("about:blank")
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .map_err(|e| ProvisionError::Launch(e.to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| ProvisionError::Launch("browser stderr unavailable".to_string()))?;

    let mut lines = BufReader::new(stderr).lines();
    let ws_endpoint = tokio::time::timeout(LAUNCH_TIMEOUT, read_endpoint(&mut lines))
        .await
        .map_err(|_| {
            ProvisionError::Handshake("timed out waiting for DevTools endpoint".to_string())
        })??;
    let devtools_port = endpoint_port(&ws_endpoint).ok_or_else(|| {
        ProvisionError::Handshake(format!("unparseable DevTools endpoint: {ws_endpoint}"))
    })?;

    // Keep draining stderr for the browser's lifetime; a full pipe would
    // stall a chatty instance.
    tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            tracing::debug!(target: "chatharvest::browser", "{line}");
        }
    });

    Ok(BrowserHandle {
        child,
        ws_endpoint,
        devtools_port,
        _user_data: user_data,
    })
}

/// Query the DevTools version endpoint, returning the browser version string.
pub async fn version(port: u16) -> Result<String, ProvisionError> {
    let url = format!("http://127.0.0.1:{port}/json/version");
    let body: serde_json::Value = reqwest::get(&url)
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| ProvisionError::Handshake(e.to_string()))?
        .json()
        .await
        .map_err(|e| ProvisionError::Handshake(e.to_string()))?;

    body.get("Browser")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProvisionError::Handshake("version response missing Browser".to_string()))
}

/// Read stderr lines until the DevTools endpoint is advertised.
///
/// Takes the line stream by reference; the caller keeps draining it after
/// the endpoint is found.
async fn read_endpoint<R>(lines: &mut Lines<R>) -> Result<String, ProvisionError>
where
    R: AsyncBufRead + Unpin,
{
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::debug!(target: "chatharvest::browser", "{line}");
        if let Some(endpoint) = parse_devtools_endpoint(&line) {
            return Ok(endpoint);
        }
    }
    Err(ProvisionError::Launch(
        "browser exited before advertising a DevTools endpoint".to_string(),
    ))
}

/// Extract the websocket endpoint from a `DevTools listening on` line.
fn parse_devtools_endpoint(line: &str) -> Option<String> {
    let rest = line.split("DevTools listening on ").nth(1)?;
    let rest = rest.trim();
    rest.starts_with("ws://").then(|| rest.to_string())
}

/// Port component of a `ws://host:port/...` endpoint.
fn endpoint_port(ws_endpoint: &str) -> Option<u16> {
    let rest = ws_endpoint.strip_prefix("ws://")?;
    let host_port = rest.split('/').next()?;
    host_port.rsplit(':').next()?.parse().ok()
}
