//! Drivers that run a client session to a terminal state.
//!
//! `run_qr_login` implements the QR session initializer: clear the old
//! session, then follow lifecycle events until the client is ready or the
//! session is rejected, persisting each QR token along the way.
//!
//! `wait_until_ready` is the extractor's front half: same state machine,
//! but QR tokens are only logged, never persisted.

use std::path::Path;

use chatharvest_types::error::SessionError;
use chatharvest_types::session::{ClientEvent, SessionState};
use tokio::sync::broadcast;

use crate::client::MessagingClient;
use crate::qr;
use crate::session::lifecycle::{SessionAction, SessionLifecycle};
use crate::session::store::SessionStore;

/// Run the QR login flow to completion.
///
/// Clears any prior persisted session first so the external client is
/// forced to issue a fresh QR token. Returns once the lifecycle reaches a
/// terminal state: `Ok` on `Ready`, an error on `AuthFailure` or
/// `Disconnected` (both of which clear the session directory).
pub async fn run_qr_login<C, S>(
    client: &C,
    store: &S,
    qr_output: &Path,
) -> Result<(), SessionError>
where
    C: MessagingClient,
    S: SessionStore,
{
    // A leftover session would let the client log in silently and never
    // emit a QR event.
    if store.exists().await {
        clear_store(store).await?;
        tracing::info!(path = %store.root().display(), "old session cleared");
    }

    let mut events = client.events();
    client.start().await?;

    let mut lifecycle = SessionLifecycle::new();
    loop {
        let event = next_event(&mut events).await?;
        log_event(&event);

        let transition = lifecycle.apply(&event);
        match transition.action {
            Some(SessionAction::PersistQr { token }) => persist_qr(&token, qr_output).await,
            Some(SessionAction::ClearSession) => {
                clear_store(store).await?;
                tracing::info!(path = %store.root().display(), "session directory cleared");
            }
            None => {}
        }

        if transition.next.is_terminal() {
            return terminal_result(transition.next, &event);
        }
    }
}

/// Follow lifecycle events until the client reports `Ready`.
///
/// Used by the extractor against an existing persisted login. A `Qr` event
/// here means no valid session exists; it is logged so the operator knows a
/// scan is required, but nothing is persisted. `AuthFailure` and
/// `Disconnected` clear the session directory and abort.
pub async fn wait_until_ready<C, S>(client: &C, store: &S) -> Result<(), SessionError>
where
    C: MessagingClient,
    S: SessionStore,
{
    let mut events = client.events();
    client.start().await?;

    let mut lifecycle = SessionLifecycle::new();
    loop {
        let event = next_event(&mut events).await?;
        log_event(&event);

        let transition = lifecycle.apply(&event);
        if let Some(SessionAction::ClearSession) = transition.action {
            clear_store(store).await?;
            tracing::info!(path = %store.root().display(), "session directory cleared");
        }

        if transition.next.is_terminal() {
            return terminal_result(transition.next, &event);
        }
    }
}

/// Watch lifecycle events for a session failure, clearing the store when
/// one arrives.
///
/// Runs alongside extraction work so an `AuthFailure` or `Disconnected`
/// fired after `Ready` still deletes the session directory. The receiver
/// must have been subscribed before the client was started; the backlog up
/// to `Ready` is replayed harmlessly. Resolves only on failure; a closed
/// event stream leaves the future pending so racing work can finish.
pub async fn watch_session<S>(
    mut events: broadcast::Receiver<ClientEvent>,
    store: &S,
) -> SessionError
where
    S: SessionStore,
{
    let mut lifecycle = SessionLifecycle::new();
    loop {
        let event = match next_event(&mut events).await {
            Ok(event) => event,
            Err(SessionError::EventStreamClosed) => {
                tracing::debug!("client event stream closed");
                std::future::pending::<ClientEvent>().await
            }
            Err(err) => return err,
        };

        let transition = lifecycle.apply(&event);
        if let Some(SessionAction::ClearSession) = transition.action {
            if let Err(err) = clear_store(store).await {
                return err;
            }
            tracing::info!(path = %store.root().display(), "session directory cleared");
        }

        if transition.next == SessionState::Disconnected {
            log_event(&event);
            if let Err(err) = terminal_result(transition.next, &event) {
                return err;
            }
        }
    }
}

async fn next_event(
    events: &mut broadcast::Receiver<ClientEvent>,
) -> Result<ClientEvent, SessionError> {
    loop {
        match events.recv().await {
            Ok(event) => return Ok(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "client event stream lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                return Err(SessionError::EventStreamClosed);
            }
        }
    }
}

fn log_event(event: &ClientEvent) {
    match event {
        ClientEvent::Qr { .. } => tracing::info!("QR code event received"),
        ClientEvent::Authenticated => tracing::info!("authenticated successfully"),
        ClientEvent::AuthFailure { reason } => {
            tracing::error!(%reason, "authentication failed");
        }
        ClientEvent::Ready => tracing::info!("client is ready"),
        ClientEvent::Disconnected { reason } => {
            tracing::info!(%reason, "client disconnected");
        }
    }
}

/// Encode and write one QR token, overwriting any previous output.
///
/// Failures are logged and swallowed: the client keeps running and a later
/// `qr` event can still succeed.
async fn persist_qr(token: &str, qr_output: &Path) {
    let data_url = match qr::encode_data_url(token) {
        Ok(data_url) => data_url,
        Err(err) => {
            tracing::error!(error = %err, "error generating QR code");
            return;
        }
    };

    if let Some(parent) = qr_output.parent() {
        if let Err(err) = tokio::fs::create_dir_all(parent).await {
            tracing::error!(error = %err, "failed to create QR output directory");
            return;
        }
    }

    match tokio::fs::write(qr_output, &data_url).await {
        Ok(()) => {
            tracing::info!(path = %qr_output.display(), %data_url, "QR code saved as base64 data");
        }
        Err(err) => tracing::error!(error = %err, "failed to write QR output file"),
    }
}

async fn clear_store<S: SessionStore>(store: &S) -> Result<(), SessionError> {
    store
        .clear()
        .await
        .map_err(|e| SessionError::Store(e.to_string()))
}

fn terminal_result(state: SessionState, event: &ClientEvent) -> Result<(), SessionError> {
    debug_assert!(state.is_terminal());
    match event {
        ClientEvent::AuthFailure { reason } => Err(SessionError::AuthFailure(reason.clone())),
        ClientEvent::Disconnected { reason } => Err(SessionError::Disconnected(reason.clone())),
        _ => Ok(()),
    }
}
