//! End-to-end message extraction flow.
//!
//! Ready the session, resolve the chat, fetch, filter, write, stop.

use std::path::Path;

use chatharvest_types::analysis::Analysis;
use chatharvest_types::error::ExtractError;
use chatharvest_types::message::ChatInfo;
use chrono::Utc;

use crate::client::MessagingClient;
use crate::extract::output::write_records;
use crate::extract::pipeline::{FETCH_LIMIT, select_records};
use crate::session::login::{wait_until_ready, watch_session};
use crate::session::store::SessionStore;

/// What an extraction run produced, for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    /// The resolved chat.
    pub chat: ChatInfo,
    /// Messages returned by the client before filtering.
    pub fetched: usize,
    /// Records written to the output file.
    pub written: usize,
}

/// Run the extractor against an existing persisted login.
///
/// Waits for the client to become ready, fetches up to [`FETCH_LIMIT`]
/// recent messages for `group_id`, applies the 24-hour window and the
/// analysis filter, and overwrites `output_path` with the result. A session
/// failure at any point, before or after ready, clears the session
/// directory and aborts the run. The client is stopped best-effort on the
/// way out, including on failure.
pub async fn run_extract<C, S>(
    client: &C,
    store: &S,
    group_id: &str,
    analysis: &Analysis,
    output_path: &Path,
) -> Result<ExtractReport, ExtractError>
where
    C: MessagingClient,
    S: SessionStore,
{
    let result = extract_inner(client, store, group_id, analysis, output_path).await;

    if let Err(err) = client.stop().await {
        tracing::warn!(error = %err, "failed to stop client cleanly");
    }

    result
}

async fn extract_inner<C, S>(
    client: &C,
    store: &S,
    group_id: &str,
    analysis: &Analysis,
    output_path: &Path,
) -> Result<ExtractReport, ExtractError>
where
    C: MessagingClient,
    S: SessionStore,
{
    // Subscribed before start so the watcher sees the full event history.
    let events = client.events();
    wait_until_ready(client, store).await?;

    // A session can still fail mid-fetch; the watcher keeps consuming
    // lifecycle events while the extraction work runs and aborts it if a
    // failure arrives, clearing the session directory.
    tokio::select! {
        result = extract_messages(client, group_id, analysis, output_path) => result,
        err = watch_session(events, store) => Err(err.into()),
    }
}

async fn extract_messages<C>(
    client: &C,
    group_id: &str,
    analysis: &Analysis,
    output_path: &Path,
) -> Result<ExtractReport, ExtractError>
where
    C: MessagingClient,
{
    let chat = client
        .chat_info(group_id)
        .await
        .map_err(chatharvest_types::error::SessionError::from)?;

    let messages = client
        .fetch_recent(group_id, FETCH_LIMIT)
        .await
        .map_err(chatharvest_types::error::SessionError::from)?;
    let fetched = messages.len();

    let now = Utc::now().timestamp();
    let records = select_records(messages, now, analysis);
    let written = records.len();

    write_records(output_path, &records).await?;

    tracing::info!(
        chat = chat.display_name(),
        fetched,
        written,
        path = %output_path.display(),
        "messages saved"
    );

    Ok(ExtractReport {
        chat,
        fetched,
        written,
    })
}
