//! BridgeClient: `MessagingClient` implementation over a Node child process.
//!
//! The embedded bridge script wires whatsapp-web.js to a JSON-line protocol
//! on stdio. A reader task owns the bridge's stdout, resolving pending calls
//! and broadcasting lifecycle events; requests are written to stdin under a
//! lock. The child is killed if the client is dropped while running.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chatharvest_core::client::MessagingClient;
use chatharvest_types::config::HarvestConfig;
use chatharvest_types::error::ClientError;
use chatharvest_types::message::{ChatInfo, RawMessage};
use chatharvest_types::session::ClientEvent;
use dashmap::DashMap;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{Mutex, broadcast, oneshot};

use crate::bridge::protocol::{BridgeFrame, BridgeRequest, parse_event};

/// The bridge script shipped with this crate.
const BRIDGE_SCRIPT: &str = include_str!("bridge.js");

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// How long `stop` waits for the bridge to exit before killing it.
const STOP_GRACE: Duration = Duration::from_secs(5);

type PendingCalls = Arc<DashMap<u64, oneshot::Sender<Result<Value, crate::bridge::protocol::BridgeError>>>>;

/// Messaging client backed by the Node bridge process.
pub struct BridgeClient {
    config: HarvestConfig,
    events_tx: broadcast::Sender<ClientEvent>,
    next_id: AtomicU64,
    pending: PendingCalls,
    proc: Mutex<Option<BridgeProcess>>,
}

struct BridgeProcess {
    child: Child,
    stdin: ChildStdin,
    /// Keeps the embedded script on disk for the lifetime of the process.
    _script: Option<tempfile::TempPath>,
}

impl BridgeClient {
    pub fn new(config: HarvestConfig) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            events_tx,
            next_id: AtomicU64::new(1),
            pending: Arc::new(DashMap::new()),
            proc: Mutex::new(None),
        }
    }

    async fn spawn_bridge(&self) -> Result<BridgeProcess, ClientError> {
        let (script_path, script_guard) = match &self.config.browser.bridge_script {
            Some(path) => (path.clone(), None),
            None => {
                let file = tempfile::Builder::new()
                    .prefix("chatharvest-bridge-")
                    .suffix(".js")
                    .tempfile()
                    .map_err(|e| ClientError::Bridge(e.to_string()))?;
                tokio::fs::write(file.path(), BRIDGE_SCRIPT)
                    .await
                    .map_err(|e| ClientError::Bridge(e.to_string()))?;
                let path = file.path().to_path_buf();
                (path, Some(file.into_temp_path()))
            }
        };

        let mut command = Command::new("node");
        command
            .arg(&script_path)
            .arg("--client-id")
            .arg(&self.config.client_id)
            .arg("--session-path")
            .arg(&self.config.session_dir);
        if let Some(executable) = &self.config.browser.executable_path {
            command.arg("--executable-path").arg(executable);
        }
        if !self.config.browser.headless {
            command.arg("--no-headless");
        }
        command
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let mut child = command
            .spawn()
            .map_err(|e| ClientError::Bridge(format!("failed to spawn node: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ClientError::Bridge("bridge stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClientError::Bridge("bridge stdout unavailable".to_string()))?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!(target: "chatharvest::bridge", "{line}");
                }
            });
        }

        spawn_reader(stdout, Arc::clone(&self.pending), self.events_tx.clone());

        tracing::info!(script = %script_path.display(), "bridge process started");
        Ok(BridgeProcess {
            child,
            stdin,
            _script: script_guard,
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);

        let mut line = serde_json::to_vec(&BridgeRequest { id, method, params })
            .map_err(|e| ClientError::Protocol(e.to_string()))?;
        line.push(b'\n');

        {
            let mut guard = self.proc.lock().await;
            let Some(proc) = guard.as_mut() else {
                self.pending.remove(&id);
                return Err(ClientError::NotStarted);
            };
            let write = async {
                proc.stdin.write_all(&line).await?;
                proc.stdin.flush().await
            };
            if let Err(err) = write.await {
                self.pending.remove(&id);
                return Err(ClientError::Bridge(err.to_string()));
            }
        }

        match rx.await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(error)) => match error.code.as_deref() {
                Some("chat_not_found") => Err(ClientError::ChatNotFound(error.message)),
                _ => Err(ClientError::Request(error.message)),
            },
            Err(_) => Err(ClientError::Bridge(
                "bridge exited before responding".to_string(),
            )),
        }
    }
}

impl MessagingClient for BridgeClient {
    async fn start(&self) -> Result<(), ClientError> {
        let mut guard = self.proc.lock().await;
        if guard.is_some() {
            return Ok(());
        }
        *guard = Some(self.spawn_bridge().await?);
        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events_tx.subscribe()
    }

    async fn chat_info(&self, chat_id: &str) -> Result<ChatInfo, ClientError> {
        let result = self
            .call("get_chat", json!({ "chatId": chat_id }))
            .await
            .map_err(|err| match err {
                ClientError::ChatNotFound(_) => ClientError::ChatNotFound(chat_id.to_string()),
                other => other,
            })?;
        serde_json::from_value(result).map_err(|e| ClientError::Protocol(e.to_string()))
    }

    async fn fetch_recent(&self, chat_id: &str, limit: u32) -> Result<Vec<RawMessage>, ClientError> {
        let result = self
            .call("fetch_messages", json!({ "chatId": chat_id, "limit": limit }))
            .await?;
        serde_json::from_value(result).map_err(|e| ClientError::Protocol(e.to_string()))
    }

    async fn stop(&self) -> Result<(), ClientError> {
        // Best effort: the bridge exits on destroy and may not reply.
        if let Err(err) = self.call("destroy", json!({})).await {
            tracing::debug!(error = %err, "destroy call did not complete");
        }

        let mut guard = self.proc.lock().await;
        if let Some(mut proc) = guard.take() {
            match tokio::time::timeout(STOP_GRACE, proc.child.wait()).await {
                Ok(_) => {}
                Err(_) => {
                    tracing::warn!("bridge did not exit in time, killing it");
                    let _ = proc.child.start_kill();
                    let _ = proc.child.wait().await;
                }
            }
        }
        Ok(())
    }
}

/// Consume the bridge's stdout, resolving pending calls and broadcasting
/// lifecycle events. Ends when the stream closes.
fn spawn_reader<R>(
    stdout: R,
    pending: PendingCalls,
    events_tx: broadcast::Sender<ClientEvent>,
) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(error = %err, "bridge stdout read failed");
                    break;
                }
            };

            match serde_json::from_str::<BridgeFrame>(&line) {
                Ok(BridgeFrame::Response { id, result, error }) => {
                    let Some((_, tx)) = pending.remove(&id) else {
                        tracing::warn!(id, "response for unknown call id");
                        continue;
                    };
                    let outcome = match error {
                        Some(error) => Err(error),
                        None => Ok(result.unwrap_or(Value::Null)),
                    };
                    let _ = tx.send(outcome);
                }
                Ok(BridgeFrame::Event { event, payload }) => {
                    match parse_event(&event, &payload) {
                        Some(event) => {
                            let _ = events_tx.send(event);
                        }
                        None => tracing::debug!(%event, "ignoring unknown bridge event"),
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, %line, "malformed bridge frame");
                }
            }
        }
        tracing::debug!("bridge stdout closed");
    })
}
