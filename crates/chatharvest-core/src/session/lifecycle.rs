//! Session lifecycle state machine.
//!
//! Client events are fed in one at a time; each application yields the next
//! state plus at most one side effect for the driver to execute. Keeping the
//! machine pure makes the transition table testable without a client,
//! a filesystem, or an event loop.
//!
//! Cleanup is unified across entry points: both `AuthFailure` and
//! `Disconnected` clear the persisted session, so the next run always
//! starts from a clean login.

use chatharvest_types::session::{ClientEvent, SessionState};

/// A side effect requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Encode the QR token and overwrite the QR output file.
    PersistQr { token: String },
    /// Recursively delete the persisted session directory.
    ClearSession,
}

/// Result of applying one event: the state entered and the effect to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: SessionState,
    pub action: Option<SessionAction>,
}

/// State machine over a client session's lifecycle events.
#[derive(Debug)]
pub struct SessionLifecycle {
    state: SessionState,
}

impl SessionLifecycle {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unauthenticated,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Apply one client event, returning the transition taken.
    ///
    /// `Disconnected` is absorbing: once entered, all further events are
    /// ignored. `Ready` ends the login flow but still reacts to
    /// `AuthFailure` and `Disconnected`, so a session that fails after
    /// becoming ready is cleared like any other. `Qr` may fire multiple
    /// times; each occurrence requests a fresh `PersistQr` so the output
    /// file always holds the latest token.
    pub fn apply(&mut self, event: &ClientEvent) -> Transition {
        let ignored = match self.state {
            SessionState::Disconnected => true,
            SessionState::Ready => !matches!(
                event,
                ClientEvent::AuthFailure { .. } | ClientEvent::Disconnected { .. }
            ),
            _ => false,
        };
        if ignored {
            return Transition {
                next: self.state,
                action: None,
            };
        }

        let transition = match event {
            ClientEvent::Qr { token } => Transition {
                next: SessionState::AwaitingScan,
                action: Some(SessionAction::PersistQr {
                    token: token.clone(),
                }),
            },
            ClientEvent::Authenticated => Transition {
                next: SessionState::Authenticated,
                action: None,
            },
            ClientEvent::AuthFailure { .. } => Transition {
                next: SessionState::Disconnected,
                action: Some(SessionAction::ClearSession),
            },
            ClientEvent::Ready => Transition {
                next: SessionState::Ready,
                action: None,
            },
            ClientEvent::Disconnected { .. } => Transition {
                next: SessionState::Disconnected,
                action: Some(SessionAction::ClearSession),
            },
        };

        self.state = transition.next;
        transition
    }
}

impl Default for SessionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qr(token: &str) -> ClientEvent {
        ClientEvent::Qr {
            token: token.to_string(),
        }
    }

    #[test]
    fn test_starts_unauthenticated() {
        assert_eq!(SessionLifecycle::new().state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_qr_enters_awaiting_scan_with_persist_action() {
        let mut lifecycle = SessionLifecycle::new();
        let transition = lifecycle.apply(&qr("token-1"));
        assert_eq!(transition.next, SessionState::AwaitingScan);
        assert_eq!(
            transition.action,
            Some(SessionAction::PersistQr {
                token: "token-1".to_string()
            })
        );
    }

    #[test]
    fn test_repeated_qr_persists_each_token() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(&qr("token-1"));
        let second = lifecycle.apply(&qr("token-2"));
        assert_eq!(second.next, SessionState::AwaitingScan);
        assert_eq!(
            second.action,
            Some(SessionAction::PersistQr {
                token: "token-2".to_string()
            })
        );
    }

    #[test]
    fn test_happy_path_qr_auth_ready() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(&qr("token-1"));
        let auth = lifecycle.apply(&ClientEvent::Authenticated);
        assert_eq!(auth.next, SessionState::Authenticated);
        assert_eq!(auth.action, None);

        let ready = lifecycle.apply(&ClientEvent::Ready);
        assert_eq!(ready.next, SessionState::Ready);
        assert_eq!(ready.action, None);
        assert!(lifecycle.state().is_terminal());
    }

    #[test]
    fn test_auth_failure_clears_session() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(&qr("token-1"));
        let failed = lifecycle.apply(&ClientEvent::AuthFailure {
            reason: "expired".to_string(),
        });
        assert_eq!(failed.next, SessionState::Disconnected);
        assert_eq!(failed.action, Some(SessionAction::ClearSession));
    }

    #[test]
    fn test_disconnect_clears_session() {
        let mut lifecycle = SessionLifecycle::new();
        let dropped = lifecycle.apply(&ClientEvent::Disconnected {
            reason: "logout".to_string(),
        });
        assert_eq!(dropped.next, SessionState::Disconnected);
        assert_eq!(dropped.action, Some(SessionAction::ClearSession));
    }

    #[test]
    fn test_disconnect_after_ready_still_clears_session() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(&ClientEvent::Ready);

        let dropped = lifecycle.apply(&ClientEvent::Disconnected {
            reason: "logout".to_string(),
        });
        assert_eq!(dropped.next, SessionState::Disconnected);
        assert_eq!(dropped.action, Some(SessionAction::ClearSession));
    }

    #[test]
    fn test_auth_failure_after_ready_still_clears_session() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(&ClientEvent::Ready);

        let failed = lifecycle.apply(&ClientEvent::AuthFailure {
            reason: "revoked".to_string(),
        });
        assert_eq!(failed.next, SessionState::Disconnected);
        assert_eq!(failed.action, Some(SessionAction::ClearSession));
    }

    #[test]
    fn test_ready_ignores_non_failure_events() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(&ClientEvent::Ready);

        let late_qr = lifecycle.apply(&qr("token-9"));
        assert_eq!(late_qr.next, SessionState::Ready);
        assert_eq!(late_qr.action, None);
    }

    #[test]
    fn test_disconnected_is_absorbing() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(&ClientEvent::Disconnected {
            reason: "logout".to_string(),
        });

        let late = lifecycle.apply(&ClientEvent::Ready);
        assert_eq!(late.next, SessionState::Disconnected);
        assert_eq!(late.action, None);

        let late_qr = lifecycle.apply(&qr("token-9"));
        assert_eq!(late_qr.action, None);
    }
}
