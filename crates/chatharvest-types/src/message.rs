//! Message and chat types.
//!
//! `RawMessage` is the wire shape delivered by the messaging client adapter;
//! `MessageRecord` is the read-only output shape written to the messages
//! JSON file. Records are never mutated after extraction.

use serde::{Deserialize, Serialize};

/// A message as delivered by the external client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Serialized message id.
    pub id: String,
    /// Sender identifier.
    pub from: String,
    /// Message body text.
    pub body: String,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Reaction count, when the client reports one.
    #[serde(default)]
    pub reactions: Option<u32>,
}

/// A message record as serialized to the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: String,
    pub from: String,
    pub body: String,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Number of reactions; 0 when the client reported none.
    pub reaction_count: u32,
}

impl From<RawMessage> for MessageRecord {
    fn from(raw: RawMessage) -> Self {
        Self {
            id: raw.id,
            from: raw.from,
            body: raw.body,
            timestamp: raw.timestamp,
            reaction_count: raw.reactions.unwrap_or(0),
        }
    }
}

/// Resolved chat metadata for a group identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatInfo {
    /// The group identifier as known to the external system.
    pub id: String,
    /// Display name, when the chat has one.
    #[serde(default)]
    pub name: Option<String>,
}

impl ChatInfo {
    /// Display name falling back to the raw identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
