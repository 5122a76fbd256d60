//! Session lifecycle states and the client event surface.
//!
//! `ClientEvent` is the narrow set of lifecycle notifications the external
//! messaging client emits. `SessionState` is the state machine position the
//! core lifecycle derives from those events. All variants are Clone + Send +
//! Sync for use with tokio broadcast channels.

use serde::{Deserialize, Serialize};

/// Position of a client session in its login lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No credentials have been presented yet.
    Unauthenticated,
    /// A QR token has been issued and is waiting to be scanned.
    AwaitingScan,
    /// Credentials accepted; the client is still synchronizing.
    Authenticated,
    /// The client is fully usable. Terminal success state.
    Ready,
    /// The session was rejected or lost. Terminal failure state.
    Disconnected,
}

impl SessionState {
    /// Whether this state ends the session run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Ready | SessionState::Disconnected)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::AwaitingScan => "awaiting_scan",
            SessionState::Authenticated => "authenticated",
            SessionState::Ready => "ready",
            SessionState::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

/// Lifecycle events emitted by the external messaging client.
///
/// May arrive in any order; `Qr` can fire multiple times until a token is
/// scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A login QR token was issued.
    Qr { token: String },
    /// Credentials were accepted.
    Authenticated,
    /// Credentials were rejected or have expired.
    AuthFailure { reason: String },
    /// The client is fully synchronized and usable.
    Ready,
    /// The live session was lost.
    Disconnected { reason: String },
}
