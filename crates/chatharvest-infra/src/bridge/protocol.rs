//! Wire protocol between the Rust side and the Node bridge.
//!
//! One JSON document per line, both directions. Rust sends requests
//! `{id, method, params}`; the bridge answers `{id, result}` or
//! `{id, error: {code, message}}` and pushes unsolicited lifecycle events
//! `{event, payload}`.

use chatharvest_types::session::ClientEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request sent to the bridge.
#[derive(Debug, Serialize)]
pub struct BridgeRequest<'a> {
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

/// A structured error returned by the bridge.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BridgeError {
    /// Machine-readable code, e.g. `chat_not_found`.
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// One line received from the bridge.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BridgeFrame {
    Response {
        id: u64,
        #[serde(default)]
        result: Option<Value>,
        #[serde(default)]
        error: Option<BridgeError>,
    },
    Event {
        event: String,
        #[serde(default)]
        payload: Value,
    },
}

/// Map a bridge event frame to a [`ClientEvent`].
///
/// Unknown event names return `None` and are ignored by the reader; the
/// bridge may grow events this side does not care about.
pub fn parse_event(name: &str, payload: &Value) -> Option<ClientEvent> {
    match name {
        "qr" => payload.as_str().map(|token| ClientEvent::Qr {
            token: token.to_string(),
        }),
        "authenticated" => Some(ClientEvent::Authenticated),
        "auth_failure" => Some(ClientEvent::AuthFailure {
            reason: payload_reason(payload),
        }),
        "ready" => Some(ClientEvent::Ready),
        "disconnected" => Some(ClientEvent::Disconnected {
            reason: payload_reason(payload),
        }),
        _ => None,
    }
}

fn payload_reason(payload: &Value) -> String {
    match payload {
        Value::String(reason) => reason.clone(),
        Value::Null => "unspecified".to_string(),
        other => other.to_string(),
    }
}
